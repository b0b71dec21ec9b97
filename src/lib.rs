// ============================================================================
// renkoview - Library
// ============================================================================
// Expose les modules publics pour les exemples et tests
// ============================================================================

pub mod api;    // Client de l'endpoint /renko-data
pub mod models; // Structures de données (barres, widget graphique)
pub mod app;    // État de l'application
pub mod ui;     // Interface utilisateur
