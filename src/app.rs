// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Encapsulation : les transitions passent par les méthodes publiques
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Garantit la cohérence de l'état
// ============================================================================

use tracing::debug;

use crate::models::{Candle, Chart, LoadState, CHART_HEIGHT};

/// État principal de l'application
///
/// Le cycle de vie est volontairement trivial : un seul chargement de
/// données au démarrage, puis une boucle d'affichage en lecture seule
/// jusqu'à ce que l'utilisateur quitte.
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Le widget graphique (options + série + dimensions)
    pub chart: Chart,

    /// État du chargement des données
    /// CONCEPT RUST : Enum pour state management
    /// - Pending : avant l'arrivée des données
    /// - Rendered : un chargement réussi (jamais plus d'un)
    /// - Failed : terminal, atteignable uniquement depuis Pending
    pub load_state: LoadState,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    /// - Première pression de 'q' : confirm_quit = true
    /// - Deuxième pression de 'q' : running = false (quit réel)
    /// - N'importe quelle autre touche : confirm_quit = false (annulation)
    pub confirm_quit: bool,
}

impl App {
    /// Crée une nouvelle instance de App, en attente de données
    ///
    /// CONCEPT RUST : Constructor pattern
    /// - Convention : fonction associée nommée "new()"
    /// - Retourne Self (alias pour le type App)
    pub fn new() -> Self {
        Self {
            running: true,
            chart: Chart::new(),
            load_state: LoadState::Pending,
            confirm_quit: false,
        }
    }

    /// Applique le résultat d'un chargement réussi
    ///
    /// Fait les trois opérations du contrat du widget, dans l'ordre :
    /// 1. set_data : remplace la totalité de la série (full replace)
    /// 2. resize : largeur mesurée de la surface + hauteur fixe
    /// 3. transition Pending → Rendered
    ///
    /// Ignoré si l'état n'est plus Pending : le chargement a lieu une fois.
    pub fn apply_bars(&mut self, candles: Vec<Candle>, surface_width: u16) {
        if self.load_state != LoadState::Pending {
            debug!(state = ?self.load_state, "Ignoring data load outside Pending state");
            return;
        }

        self.chart.series.set_data(candles);
        self.chart.resize(surface_width, CHART_HEIGHT);
        self.load_state = LoadState::Rendered;
    }

    /// Marque le chargement comme échoué (état terminal)
    ///
    /// CONCEPT : Failure path unique
    /// - L'erreur elle-même est seulement loggée par l'appelant
    /// - Le graphique reste non rendu, sans état d'erreur visible
    pub fn mark_failed(&mut self) {
        if self.load_state == LoadState::Pending {
            self.load_state = LoadState::Failed;
        }
    }

    /// Vérifie si les données sont chargées et affichées
    pub fn is_rendered(&self) -> bool {
        self.load_state == LoadState::Rendered
    }

    /// Vérifie si on attend encore les données
    pub fn is_pending(&self) -> bool {
        self.load_state == LoadState::Pending
    }

    /// Quitte l'application
    ///
    /// CONCEPT RUST : &mut self
    /// - self est une référence mutable (on peut modifier l'objet)
    /// - Borrow checker s'assure qu'il n'y a qu'une seule ref mutable
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle
    ///
    /// CONCEPT : Event Loop Pattern
    /// - tick() est appelé régulièrement (chaque frame)
    /// - Rien à mettre à jour ici : l'état ne change plus après le démarrage
    pub fn tick(&mut self) {}

    /// Demande la confirmation de quitter
    ///
    /// CONCEPT : Two-step quit pattern
    /// - Appelé lors de la première pression de 'q'
    /// - Active l'état confirm_quit pour attendre une seconde pression
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }
}

// ============================================================================
// Trait Default
// ============================================================================
// Convention Rust : si new() ne prend pas de paramètres, implémenter Default
// ============================================================================

impl Default for App {
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
    fn test_app_creation() {
        let app = App::new();
        assert!(app.is_running());
        assert!(app.is_pending());
        assert!(app.chart.series.is_empty());
    }

    #[test]
    fn test_apply_bars_transitions_to_rendered() {
        let mut app = App::new();
        app.apply_bars(sample_candles(), 120);

        assert!(app.is_rendered());
        assert_eq!(app.chart.series.len(), 2);
        // Resize : largeur mesurée + hauteur fixe 400
        assert_eq!(app.chart.width, 120);
        assert_eq!(app.chart.height, 400);
    }

    #[test]
    fn test_apply_empty_bars_is_rendered() {
        // Séquence vide : le graphique est rendu, juste sans points
        let mut app = App::new();
        app.apply_bars(Vec::new(), 80);

        assert!(app.is_rendered());
        assert!(app.chart.series.is_empty());
    }

    #[test]
    fn test_mark_failed_is_terminal() {
        let mut app = App::new();
        app.mark_failed();
        assert_eq!(app.load_state, LoadState::Failed);

        // Pas de transition Failed → Rendered
        app.apply_bars(sample_candles(), 120);
        assert_eq!(app.load_state, LoadState::Failed);
        assert!(app.chart.series.is_empty());
    }

    #[test]
    fn test_rendered_ignores_second_load() {
        let mut app = App::new();
        app.apply_bars(sample_candles(), 120);

        // Un deuxième chargement n'écrase pas le premier
        app.apply_bars(Vec::new(), 60);
        assert_eq!(app.chart.series.len(), 2);
        assert_eq!(app.chart.width, 120);
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new();
        assert!(app.is_running());

        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_quit_confirmation_flow() {
        let mut app = App::new();
        assert!(!app.is_awaiting_quit_confirmation());

        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());

        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());
        assert!(app.is_running());
    }
}
