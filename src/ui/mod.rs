// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;      // Gestion des événements clavier
pub mod view;        // Rendu de l'interface principale
pub mod candlestick; // Rendu des chandeliers japonais (Unicode text)

// Re-exports pour simplifier les imports
pub use events::{Event, EventHandler};
pub use view::render;
