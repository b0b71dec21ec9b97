// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod bar;   // Déclaration du module bar (fichier bar.rs)
pub mod chart; // Déclaration du module chart (fichier chart.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use renkoview::models::bar::Candle;
// On peut faire : use renkoview::models::Candle;
pub use bar::Candle;
pub use chart::{
    CandlestickSeries, CandlestickSeriesOptions, Chart, ChartOptions, LoadState, CHART_HEIGHT,
};
