// ============================================================================
// renkoview - Visualiseur de barres Renko/OHLC dans le terminal
// ============================================================================
// Programme TUI qui, au démarrage, charge une fois les barres de prix
// depuis l'endpoint local /renko-data, les transforme, et les affiche
// dans un graphique en chandeliers au thème sombre
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : tokio::runtime::Runtime pour l'unique appel HTTP
// 4. RAII : restauration automatique du terminal
// ============================================================================

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use renkoview::api::{fetch_renko_bars, DEFAULT_BASE_URL};
use renkoview::app::App;
use renkoview::ui::{events::EventHandler, render};

/// Largeur de repli si la taille du terminal n'est pas mesurable
const FALLBACK_TERMINAL_WIDTH: u16 = 80;

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place
// - Tracing : framework moderne de logging structuré
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : transforme et route les logs
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
/// - RollingFileAppender : rotation automatique
///
/// Les logs sont écrits dans :
/// - Linux/WSL : ~/.local/share/renkoview/logs/renkoview.log
/// - macOS : ~/Library/Application Support/renkoview/logs/renkoview.log
/// - Repli : ./logs/renkoview.log
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/renkoview/logs/renkoview.log
///
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=renkoview=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Emplacement cross-platform des logs, avec repli local
    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("renkoview").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("./logs"));

    // Crée le répertoire s'il n'existe pas
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // Configure la rotation quotidienne des logs
    // CONCEPT : Log rotation
    // - Rotation::DAILY : nouveau fichier chaque jour
    // - Évite que les logs deviennent trop gros
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "renkoview.log");

    // Configure le subscriber (receveur de logs)
    // CONCEPT : Builder pattern avec layers
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: renkoview::api::renko)
                .with_line_number(true), // Inclut le numéro de ligne
        )
        .with(
            // Filtre les logs par niveau
            // CONCEPT : EnvFilter
            // - RUST_LOG=debug : tous les logs debug+
            // - Par défaut : debug pour renkoview, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "renkoview=debug,info".into()),
        )
        .init();

    // Premier log : confirme que le logging est initialisé
    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================
// CONCEPT RUST : Async dans sync
// - main() est synchrone (pour TUI)
// - Mais on a besoin d'async pour l'appel HTTP
// - Solution : tokio::runtime::Runtime pour exécuter du code async
// ============================================================================

fn main() -> Result<()> {
    // Initialize logging FIRST
    // - Si init échoue, on affiche l'erreur et continue quand même
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("renkoview starting up");

    // Charge les barres une seule fois au démarrage (l'analogue du
    // "page-ready" : un seul GET, pas de retry, pas de rafraîchissement)
    info!("Loading renko data");
    println!("📊 Chargement des données...");

    let runtime = tokio::runtime::Runtime::new()?;
    let mut app = App::new();

    // CONCEPT RUST : Exécuter du code async dans du code sync
    // - .block_on() : exécute la future de manière bloquante
    // - L'unique point de suspension du programme
    match runtime.block_on(fetch_renko_bars(DEFAULT_BASE_URL)) {
        Ok(candles) => {
            info!(bars = candles.len(), "Renko data loaded successfully");
            println!("✅ {} barres chargées !", candles.len());

            // Largeur mesurée de la surface d'affichage ; la hauteur du
            // widget est la constante CHART_HEIGHT
            let (width, _) = crossterm::terminal::size()
                .unwrap_or((FALLBACK_TERMINAL_WIDTH, 0));
            app.apply_bars(candles, width);
        }
        Err(e) => {
            // Unique chemin d'échec : réseau et parsing confondus.
            // Seulement loggé ; le graphique restera non rendu, sans
            // message d'erreur à l'écran.
            error!(error = ?e, "Failed to load renko data");
            app.mark_failed();
        }
    }

    // Setup du terminal en mode TUI
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // Crée le gestionnaire d'événements
    let events = EventHandler::new();

    // Exécute l'event loop
    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// CONCEPT : Game Loop / Event Loop Pattern
// - Loop infinie : while app.is_running()
// - À chaque itération :
//   1. Dessiner l'interface (render)
//   2. Traiter les événements (input)
//   3. Mettre à jour l'état (update)
// ============================================================================

/// Exécute la boucle principale de l'application
///
/// L'état est possédé par ce thread : les données ne changent plus après
/// le démarrage, donc pas de partage entre threads ni de worker
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    while app.is_running() {
        // ========================================
        // 1. RENDER : Dessine l'interface
        // ========================================
        terminal.draw(|frame| render(frame, app))?;

        // ========================================
        // 2. INPUT : Traite les événements
        // ========================================
        if let Ok(event) = events.next() {
            handle_event(app, event);
        }

        // ========================================
        // 3. UPDATE : Met à jour l'état
        // ========================================
        app.tick();
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Guard clauses (if) pour filtrer les événements
/// - L'interface est en lecture seule : seul le quit est géré
fn handle_event(app: &mut App, event: renkoview::ui::events::Event) {
    use renkoview::ui::events::{is_escape_event, is_quit_event, Event};

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Touche 'q' : quit confirmation two-step
            // CONCEPT : Two-step confirmation pour éviter les quits accidentels
            // - Première pression : active confirm_quit
            // - Deuxième pression : quit réel
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        Event::Key(_) if is_escape_event(&event) => {
            app.cancel_quit();
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation si active
            app.cancel_quit();
        }

        Event::Tick => {
            // Tick régulier : rien à faire
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// CONCEPT RUST : Terminal raw mode
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
// - Crossterm gère tout ça de manière cross-platform
//
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
///
/// CONCEPT RUST : Error propagation avec ?
/// - Chaque opération peut échouer
/// - ? propage automatiquement les erreurs
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
///
/// CONCEPT : Cleanup et RAII
/// - Appelé dans main() même en cas d'erreur
/// - Restaure le terminal pour ne pas le laisser cassé
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
