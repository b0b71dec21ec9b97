// ============================================================================
// Structures : Chart / CandlestickSeries (contrat du widget graphique)
// ============================================================================
// Modélise le widget graphique et sa série en chandeliers : options de
// rendu, données affichées, dimensions logiques et état de chargement.
// Le peintre TUI (module ui) ne fait que lire ces structures.
//
// CONCEPTS RUST :
// 1. Struct d'options + Default : configuration déclarative du widget
// 2. Enum pour state machine : Pending → Rendered | Failed
// 3. Encapsulation : set_data() remplace tout, jamais d'ajout incrémental
// ============================================================================

use ratatui::style::Color;

use crate::models::Candle;

// ============================================================================
// Constantes
// ============================================================================

/// Palette sombre du graphique
/// - Fond #1e222d, grille #2a2e39, texte #d1d4dc
const BACKGROUND_COLOR: Color = Color::Rgb(30, 34, 45);
const GRID_COLOR: Color = Color::Rgb(42, 46, 57);
const TEXT_COLOR: Color = Color::Rgb(209, 212, 220);

/// Couleurs des chandeliers haussiers et baissiers
/// - Vert #26a69a pour les barres montantes
/// - Rouge #ef5350 pour les barres descendantes
const UP_COLOR: Color = Color::Rgb(38, 166, 154);
const DOWN_COLOR: Color = Color::Rgb(239, 83, 80);

/// Hauteur fixe de la surface du graphique (unités logiques du widget)
pub const CHART_HEIGHT: u16 = 400;

// ============================================================================
// Options du graphique
// ============================================================================

/// Options globales du widget graphique
///
/// CONCEPT : Options déclaratives
/// - Le widget est configuré une fois à la création
/// - Le peintre lit ces options à chaque frame, sans les modifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    /// Couleur de fond (thème sombre)
    pub background: Color,

    /// Couleur des lignes de grille
    pub grid_color: Color,

    /// Couleur du texte (axes, labels)
    pub text_color: Color,

    /// Affiche l'heure sur l'axe temporel
    pub time_visible: bool,

    /// Affiche les secondes dans les labels de l'axe temporel
    /// Désactivé : les labels sont au format HH:MM
    pub seconds_visible: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            background: BACKGROUND_COLOR,
            grid_color: GRID_COLOR,
            text_color: TEXT_COLOR,
            time_visible: true,
            seconds_visible: false,
        }
    }
}

/// Options de la série en chandeliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandlestickSeriesOptions {
    /// Couleur des barres haussières
    pub up_color: Color,

    /// Couleur des barres baissières
    pub down_color: Color,

    /// Dessine les mèches (high/low au-delà du corps)
    pub wick_visible: bool,

    /// Dessine une bordure autour du corps (désactivé)
    pub border_visible: bool,
}

impl Default for CandlestickSeriesOptions {
    fn default() -> Self {
        Self {
            up_color: UP_COLOR,
            down_color: DOWN_COLOR,
            wick_visible: true,
            border_visible: false,
        }
    }
}

// ============================================================================
// Série en chandeliers
// ============================================================================

/// Série en chandeliers attachée au graphique
///
/// CONCEPT RUST : Ownership
/// - La série possède son Vec<Candle>
/// - set_data() remplace la totalité des données (full replace)
/// - Aucune mutation barre par barre après construction
#[derive(Debug, Clone, Default)]
pub struct CandlestickSeries {
    /// Options de rendu de la série
    pub options: CandlestickSeriesOptions,

    /// Données affichées, triées par timestamp croissant (supposé, non validé)
    data: Vec<Candle>,
}

impl CandlestickSeries {
    /// Crée une série vide avec les options par défaut
    pub fn new() -> Self {
        Self::default()
    }

    /// Remplace la totalité des données de la série
    ///
    /// CONCEPT : Full replace, pas de streaming
    /// - Les données précédentes sont jetées
    /// - Une séquence vide est acceptée (graphique sans points)
    pub fn set_data(&mut self, data: Vec<Candle>) {
        self.data = data;
    }

    /// Accès en lecture aux données
    pub fn data(&self) -> &[Candle] {
        &self.data
    }

    /// Retourne le nombre de barres
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Vérifie si la série est vide
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Retourne la barre la plus récente
    pub fn last(&self) -> Option<&Candle> {
        self.data.last()
    }

    /// Calcule le prix minimum sur toute la série
    pub fn min_price(&self) -> Option<f64> {
        self.data
            .iter()
            .map(|c| c.low)
            .min_by(|a, b| a.partial_cmp(b).unwrap())
    }

    /// Calcule le prix maximum sur toute la série
    pub fn max_price(&self) -> Option<f64> {
        self.data
            .iter()
            .map(|c| c.high)
            .max_by(|a, b| a.partial_cmp(b).unwrap())
    }

    /// Calcule la variation totale en pourcentage
    ///
    /// CONCEPT RUST : Pattern matching avec if let
    /// - Destructure first et last en une seule condition
    pub fn total_change_percent(&self) -> Option<f64> {
        if let (Some(first), Some(last)) = (self.data.first(), self.data.last()) {
            if first.open == 0.0 {
                return None;
            }
            Some(((last.close - first.open) / first.open) * 100.0)
        } else {
            None
        }
    }
}

// ============================================================================
// État de chargement
// ============================================================================

/// État de chargement du graphique
///
/// CONCEPT RUST : Enums pour state machines
/// - Pending : avant l'arrivée des données
/// - Rendered : après un chargement réussi
/// - Failed : état terminal, atteignable uniquement depuis Pending
/// - Aucune transition de retour vers Pending : le chargement a lieu une fois
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// En attente des données
    Pending,

    /// Données chargées et affichées
    Rendered,

    /// Échec du chargement (terminal, seulement loggé)
    Failed,
}

// ============================================================================
// Widget graphique
// ============================================================================

/// Le widget graphique : options + série + dimensions logiques
#[derive(Debug, Clone)]
pub struct Chart {
    /// Options globales du graphique
    pub options: ChartOptions,

    /// Série en chandeliers (une seule série)
    pub series: CandlestickSeries,

    /// Largeur logique de la surface (mesurée au chargement)
    pub width: u16,

    /// Hauteur logique de la surface (constante CHART_HEIGHT)
    pub height: u16,
}

impl Chart {
    /// Crée un graphique vide avec les options par défaut
    pub fn new() -> Self {
        Self {
            options: ChartOptions::default(),
            series: CandlestickSeries::new(),
            width: 0,
            height: 0,
        }
    }

    /// Redimensionne la surface logique du graphique
    ///
    /// Appelé une seule fois par chargement réussi, avec la largeur mesurée
    /// de la surface d'affichage et la hauteur fixe CHART_HEIGHT
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }
}

impl Default for Chart {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candles() -> Vec<Candle> {
        vec![
            Candle::new(1_735_689_600, 100.0, 110.0, 95.0, 105.0),
            Candle::new(1_735_693_200, 105.0, 115.0, 100.0, 110.0),
        ]
    }

    #[test]
    fn test_default_options_dark_theme() {
        let options = ChartOptions::default();
        assert_eq!(options.background, Color::Rgb(30, 34, 45));
        assert_eq!(options.grid_color, Color::Rgb(42, 46, 57));
        assert_eq!(options.text_color, Color::Rgb(209, 212, 220));
        assert!(options.time_visible);
        assert!(!options.seconds_visible);
    }

    #[test]
    fn test_default_series_options() {
        let options = CandlestickSeriesOptions::default();
        assert_eq!(options.up_color, Color::Rgb(38, 166, 154));
        assert_eq!(options.down_color, Color::Rgb(239, 83, 80));
        assert!(options.wick_visible);
        assert!(!options.border_visible);
    }

    #[test]
    fn test_set_data_full_replace() {
        let mut series = CandlestickSeries::new();
        assert!(series.is_empty());

        series.set_data(sample_candles());
        assert_eq!(series.len(), 2);

        // Un deuxième set_data remplace, n'ajoute pas
        series.set_data(vec![Candle::new(1_735_696_800, 110.0, 112.0, 108.0, 111.0)]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.last().unwrap().time, 1_735_696_800);
    }

    #[test]
    fn test_set_data_empty_is_valid() {
        let mut series = CandlestickSeries::new();
        series.set_data(sample_candles());
        series.set_data(Vec::new());

        assert!(series.is_empty());
        assert!(series.min_price().is_none());
        assert!(series.total_change_percent().is_none());
    }

    #[test]
    fn test_price_bounds() {
        let mut series = CandlestickSeries::new();
        series.set_data(sample_candles());

        assert_eq!(series.min_price(), Some(95.0));
        assert_eq!(series.max_price(), Some(115.0));
    }

    #[test]
    fn test_total_change_percent() {
        let mut series = CandlestickSeries::new();
        series.set_data(sample_candles());

        // (110 - 100) / 100 = 10%
        assert_eq!(series.total_change_percent(), Some(10.0));
    }

    #[test]
    fn test_chart_resize() {
        let mut chart = Chart::new();
        assert_eq!(chart.width, 0);

        chart.resize(120, CHART_HEIGHT);
        assert_eq!(chart.width, 120);
        assert_eq!(chart.height, 400);
    }
}
