// ============================================================================
// View - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI : un header d'informations et la surface du
// graphique, selon l'état de chargement
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, etc.)
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::LoadState;
use crate::ui::candlestick;

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Pattern matching sur app.load_state
/// - Le compilateur garantit l'exhaustivité (tous les cas gérés)
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `app` - État de l'application
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    // Dessine le header (titre + stats ou confirmation de quit)
    render_header(frame, app, chunks[0]);

    // Dessine la surface du graphique selon l'état de chargement
    // CONCEPT : State machine → rendu
    // - Pending : surface vide, ligne de chargement dans le header
    // - Rendered : chandeliers (ou surface vide si séquence vide)
    // - Failed : surface vide, AUCUN message d'erreur (seulement loggé)
    match app.load_state {
        LoadState::Rendered => {
            candlestick::render_chart(frame, &app.chart, chunks[1]);
        }
        LoadState::Pending | LoadState::Failed => {
            candlestick::render_empty_chart(frame, &app.chart, chunks[1]);
        }
    }
}

// ============================================================================
// Layout : Découpage de l'écran
// ============================================================================

/// Crée le layout principal (header, surface du graphique)
///
/// CONCEPT RUST : Rc<[T]> vs Vec<T>
/// - Layout::split() retourne Rc<[Rect]> (reference counted slice)
/// - On le convertit en Vec avec .to_vec() pour simplifier
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Graphique : tout le reste
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

/// Dessine le header avec les statistiques de la série
///
/// CONCEPT : Confirmation de quit two-step
/// - Si app.is_awaiting_quit_confirmation(), affiche message d'avertissement
/// - Sinon, affiche les stats de la série et les shortcuts
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(app.chart.options.background))
        .title(" 📊 renkoview ");

    let text = if app.is_awaiting_quit_confirmation() {
        // Message de confirmation de quit
        vec![Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])]
    } else {
        match app.load_state {
            LoadState::Pending => vec![Line::from("Chargement des données...")],
            LoadState::Rendered | LoadState::Failed => stats_line(app),
        }
    };

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Construit la ligne de statistiques de la série
///
/// CONCEPT RUST : Pattern matching avec if let
/// - La série peut être vide (ou jamais chargée) : on n'affiche alors
///   que les shortcuts, sans stats ni message d'erreur
fn stats_line(app: &App) -> Vec<Line<'_>> {
    let series = &app.chart.series;

    let mut spans = Vec::new();

    if let (Some(last), Some(change)) = (series.last(), series.total_change_percent()) {
        let color = if change >= 0.0 { Color::Green } else { Color::Red };
        let arrow = if change >= 0.0 { "▲" } else { "▼" };

        spans.extend([
            Span::raw(format!("{} barres  ", series.len())),
            Span::raw("Dernier: "),
            Span::styled(
                format!("${:.2}", last.close),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("{} {:+.2}%", arrow, change), Style::default().fg(color)),
            Span::raw("  "),
        ]);
    }

    spans.extend([
        Span::styled(
            "[q]",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Quitter"),
    ]);

    vec![Line::from(spans)]
}
