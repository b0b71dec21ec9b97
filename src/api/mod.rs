// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client HTTP qui récupère les barres de prix
// depuis le serveur local (endpoint /renko-data)
// ============================================================================

pub mod renko; // Client de l'endpoint /renko-data

// Re-export des fonctions principales
pub use renko::{fetch_renko_bars, DEFAULT_BASE_URL};
