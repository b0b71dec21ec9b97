// ============================================================================
// Candlestick Chart - Rendu texte ligne par ligne
// ============================================================================
// Peint la série en chandeliers du widget graphique avec des caractères
// Unicode, dans le style de cli-candlestick-chart intégré à ratatui
//
// ALGORITHME :
// - Rendu vertical : ligne par ligne de haut en bas
// - Pour chaque ligne, on détermine quel caractère Unicode afficher
// - Logique des 3 zones : mèche supérieure, corps, mèche inférieure
// - Seuils fractionnaires (0.25, 0.75) pour précision sub-caractère
//
// CARACTÈRES UNICODE :
// ┃ Corps plein          │ Mèche pleine
// ╻ Demi-corps (bas)     ╹ Demi-corps (haut)
// ╽ Transition top       ╿ Transition bottom
// ╷ Demi-mèche sup       ╵ Demi-mèche inf
// ============================================================================

use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{Candle, Chart};

// ============================================================================
// Constantes
// ============================================================================

/// Caractères Unicode pour le rendu des chandeliers
const UNICODE_VOID: char = ' ';
const UNICODE_BODY: char = '┃';              // Corps plein
const UNICODE_HALF_BODY_BOTTOM: char = '╻';  // Corps avec espace en bas
const UNICODE_HALF_BODY_TOP: char = '╹';     // Corps avec espace en haut
const UNICODE_WICK: char = '│';              // Mèche pleine
const UNICODE_TOP: char = '╽';               // Transition corps→mèche (haut)
const UNICODE_BOTTOM: char = '╿';            // Transition corps→mèche (bas)
const UNICODE_UPPER_WICK: char = '╷';        // Demi-mèche supérieure
const UNICODE_LOWER_WICK: char = '╵';        // Demi-mèche inférieure

/// Largeur de l'axe Y (pour les prix)
const Y_AXIS_WIDTH: u16 = 12;

/// Constantes pour le design réactif
/// - MIN_TERMINAL_WIDTH : largeur minimale absolue pour afficher le graphique
/// - ADAPTIVE_Y_AXIS_THRESHOLD : en dessous, on réduit la largeur de l'axe Y
/// - NARROW_Y_AXIS_WIDTH : largeur réduite de l'axe Y pour terminaux étroits
const MIN_TERMINAL_WIDTH: u16 = 60;
const ADAPTIVE_Y_AXIS_THRESHOLD: u16 = 80;
const NARROW_Y_AXIS_WIDTH: u16 = 8;

/// Espace minimum entre deux labels de date sur la dernière ligne
const MIN_DATE_SPACING: f64 = 2.0;

// ============================================================================
// Structure principale
// ============================================================================

/// Peintre de chandeliers : projette la série du widget sur une zone texte
///
/// Les couleurs et la visibilité des mèches viennent des options de la
/// série ; la géométrie vient de la zone d'affichage fournie par ratatui.
pub struct CandlestickPainter<'a> {
    chart: &'a Chart,
    min_price: f64,
    max_price: f64,
    height: u16,
    width: u16,
    y_axis_width: u16,
}

impl<'a> CandlestickPainter<'a> {
    /// Crée un nouveau peintre pour la zone donnée
    ///
    /// CONCEPT : Responsive design
    /// - Adapte la largeur de l'axe Y selon la largeur du terminal
    /// - Largeur < 80 cols : axe Y réduit à 8 caractères
    /// - Largeur >= 80 cols : axe Y normal à 12 caractères
    pub fn new(chart: &'a Chart, area: Rect) -> Self {
        let (min_price, max_price) = Self::compute_price_bounds(chart.series.data());

        let y_axis_width = if area.width < ADAPTIVE_Y_AXIS_THRESHOLD {
            NARROW_Y_AXIS_WIDTH
        } else {
            Y_AXIS_WIDTH
        };

        Self {
            chart,
            min_price,
            max_price,
            // Réserve 2 pour les bordures + 3 pour l'axe X (ticks, heures, dates)
            height: area.height.saturating_sub(5),
            width: area.width.saturating_sub(y_axis_width + 2),
            y_axis_width,
        }
    }

    /// Calcule les prix min et max sur toutes les barres, avec marge de 2%
    fn compute_price_bounds(candles: &[Candle]) -> (f64, f64) {
        let max_price = candles
            .iter()
            .fold(f64::NEG_INFINITY, |max, c| max.max(c.high));

        let min_price = candles.iter().fold(f64::INFINITY, |min, c| min.min(c.low));

        let margin = (max_price - min_price) * 0.02;
        ((min_price - margin).max(0.0), max_price + margin)
    }

    /// Convertit un prix en coordonnée de hauteur
    fn price_to_height(&self, price: f64) -> f64 {
        if self.max_price == self.min_price {
            return self.height as f64 / 2.0;
        }

        (price - self.min_price) / (self.max_price - self.min_price) * self.height as f64
    }

    /// Retourne la couleur de la barre selon les options de la série
    fn candle_color(&self, candle: &Candle) -> Color {
        if candle.is_bullish() {
            self.chart.series.options.up_color
        } else {
            self.chart.series.options.down_color
        }
    }

    /// Rend une barre à une hauteur donnée
    ///
    /// Ceci est le cœur de l'algorithme, adapté de cli-candlestick-chart.
    /// Il détermine quel caractère Unicode afficher selon la position
    /// verticale. Si les mèches sont désactivées dans les options de la
    /// série, les zones de mèche restent vides.
    fn render_candle(&self, candle: &Candle, y: u16) -> char {
        let height_unit = y as f64;
        let wick_visible = self.chart.series.options.wick_visible;

        // Convertit les prix en coordonnées de hauteur
        let high_y = self.price_to_height(candle.high);
        let low_y = self.price_to_height(candle.low);
        let max_y = self.price_to_height(candle.open.max(candle.close));
        let min_y = self.price_to_height(candle.close.min(candle.open));

        let mut output = UNICODE_VOID;

        // ========================================
        // ZONE 1 : Mèche supérieure (high → max)
        // ========================================
        if high_y.ceil() >= height_unit && height_unit >= max_y.floor() {
            if max_y - height_unit > 0.75 {
                // Corps s'étend significativement dans cette ligne
                output = UNICODE_BODY;
            } else if (max_y - height_unit) > 0.25 {
                // Corps partiellement présent
                if wick_visible && (high_y - height_unit) > 0.75 {
                    // Mèche s'étend aussi → transition
                    output = UNICODE_TOP;
                } else {
                    // Juste le corps avec espace
                    output = UNICODE_HALF_BODY_BOTTOM;
                }
            } else if wick_visible && (high_y - height_unit) > 0.75 {
                // Que la mèche, pleine
                output = UNICODE_WICK;
            } else if wick_visible && (high_y - height_unit) > 0.25 {
                // Demi-mèche
                output = UNICODE_UPPER_WICK;
            }
        }
        // ========================================
        // ZONE 2 : Corps (min → max)
        // ========================================
        else if max_y.floor() >= height_unit && height_unit >= min_y.ceil() {
            // Toujours corps plein dans la zone du corps
            output = UNICODE_BODY;
        }
        // ========================================
        // ZONE 3 : Mèche inférieure (min → low)
        // ========================================
        else if min_y.ceil() >= height_unit && height_unit >= low_y.floor() {
            if (min_y - height_unit) < 0.25 {
                // Corps encore très proche
                output = UNICODE_BODY;
            } else if (min_y - height_unit) < 0.75 {
                // Corps partiellement présent
                if wick_visible && (low_y - height_unit) < 0.25 {
                    // Mèche proche aussi → transition
                    output = UNICODE_BOTTOM;
                } else {
                    // Juste le corps avec espace
                    output = UNICODE_HALF_BODY_TOP;
                }
            } else if wick_visible && low_y - height_unit < 0.25 {
                // Que la mèche, pleine
                output = UNICODE_WICK;
            } else if wick_visible && low_y - height_unit < 0.75 {
                // Demi-mèche
                output = UNICODE_LOWER_WICK;
            }
        }

        output
    }

    /// Rend une ligne de l'axe Y avec le prix
    fn render_y_axis(&self, y: u16) -> String {
        let price_width = self.y_axis_width.saturating_sub(3) as usize;

        // Affiche le prix toutes les 4 lignes
        if y % 4 == 0 {
            let price = self.min_price
                + (y as f64 * (self.max_price - self.min_price) / self.height as f64);
            format!("{:>width$.2} │ ", price, width = price_width)
        } else {
            format!("{:>width$} │ ", "", width = price_width)
        }
    }

    /// Sélectionne les barres visibles (les N dernières qui tiennent à l'écran)
    fn visible_candles(&self) -> &[Candle] {
        let candles = self.chart.series.data();
        let max_visible = self.width as usize;
        if candles.len() <= max_visible {
            candles
        } else {
            &candles[candles.len() - max_visible..]
        }
    }

    /// Format des labels de temps selon les options du graphique
    ///
    /// CONCEPT : Secondes masquées
    /// - seconds_visible = false : "HH:MM" (la forme normale)
    /// - seconds_visible = true : "HH:MM:SS"
    fn time_label_format(&self) -> &'static str {
        if self.chart.options.seconds_visible {
            "%H:%M:%S"
        } else {
            "%H:%M"
        }
    }

    /// Convertit le timestamp Unix d'une barre en DateTime UTC
    ///
    /// CONCEPT RUST : Option et unwrap_or
    /// - from_timestamp retourne None pour un timestamp hors bornes
    /// - On retombe sur l'epoch plutôt que de paniquer en plein rendu
    fn candle_datetime(candle: &Candle) -> DateTime<Utc> {
        DateTime::from_timestamp(candle.time, 0).unwrap_or_default()
    }

    /// Génère toutes les lignes du graphique (chandeliers + axe X)
    pub fn render_lines(&self) -> Vec<Line<'a>> {
        let mut lines = Vec::new();
        let visible = self.visible_candles();

        if visible.is_empty() {
            return lines;
        }

        // Calcule l'espacement entre barres pour remplir toute la largeur
        // Chaque barre = 1 caractère + espaces après
        let spacing = if visible.len() > 1 {
            self.width as f64 / visible.len() as f64
        } else {
            1.0
        };

        let axis_style = Style::default().fg(self.chart.options.grid_color);

        // Parcourt de haut en bas (reversed)
        for y in (1..=self.height).rev() {
            let mut spans = Vec::new();

            // Ajoute l'axe Y
            spans.push(Span::styled(
                self.render_y_axis(y),
                Style::default().fg(self.chart.options.text_color),
            ));

            // Ajoute chaque barre avec espacement
            for (i, candle) in visible.iter().enumerate() {
                let ch = self.render_candle(candle, y);
                let color = self.candle_color(candle);

                spans.push(Span::styled(ch.to_string(), Style::default().fg(color)));

                // Ajoute l'espacement après (sauf pour la dernière)
                if i < visible.len() - 1 {
                    let num_spaces = (spacing - 1.0).round() as usize;
                    if num_spaces > 0 {
                        spans.push(Span::styled(" ".repeat(num_spaces), axis_style));
                    }
                }
            }

            lines.push(Line::from(spans));
        }

        // Ajoute l'axe X (ticks + heures + dates)
        lines.extend(self.render_x_axis(visible, spacing));

        lines
    }

    /// Génère les lignes de l'axe X avec tick marks et labels
    ///
    /// Structure à 3 lignes :
    /// - Ligne 1 : tick marks │
    /// - Ligne 2 : heures (HH:MM, secondes masquées) si time_visible
    /// - Ligne 3 : dates aux changements de jour
    fn render_x_axis(&self, visible: &[Candle], spacing: f64) -> Vec<Line<'a>> {
        let mut lines = vec![];

        let label_format = self.time_label_format();
        let label_style = Style::default().fg(self.chart.options.text_color);
        let tick_style = Style::default().fg(self.chart.options.grid_color);

        // Calcule combien de labels on peut afficher
        // "HH:MM" = 5 chars, "HH:MM:SS" = 8 ; +2 d'espacement garanti
        let estimated_label_width = if self.chart.options.seconds_visible { 8 } else { 5 };
        let min_space_per_label = estimated_label_width + 2;
        let max_labels = (self.width as usize / min_space_per_label).max(2).min(10);

        // Détermine quelles barres auront un label
        let label_interval = if visible.len() <= max_labels {
            1
        } else {
            visible.len() / max_labels
        };

        // Ligne 1 : Tick marks
        let mut tick_spans = vec![Span::raw(format!(
            "{:>width$}",
            "",
            width = self.y_axis_width as usize
        ))];

        for (i, _candle) in visible.iter().enumerate() {
            let tick = if i % label_interval == 0 { "│" } else { " " };

            tick_spans.push(Span::styled(tick, tick_style));

            if i < visible.len() - 1 {
                let num_spaces = (spacing - 1.0).round() as usize;
                if num_spaces > 0 {
                    tick_spans.push(Span::raw(" ".repeat(num_spaces)));
                }
            }
        }

        lines.push(Line::from(tick_spans));

        // Ligne 2 : Labels de temps (si l'axe temporel est visible)
        if self.chart.options.time_visible {
            let mut label_spans = vec![Span::raw(format!(
                "{:>width$}",
                "",
                width = self.y_axis_width as usize
            ))];

            let mut position = 0.0;
            for (i, candle) in visible.iter().enumerate() {
                if i % label_interval == 0 {
                    let time_label = Self::candle_datetime(candle)
                        .format(label_format)
                        .to_string();

                    label_spans.push(Span::styled(time_label.clone(), label_style));

                    let next_label_position = if i + label_interval < visible.len() {
                        (i + label_interval) as f64 * spacing
                    } else {
                        self.width as f64
                    };

                    let space_to_next =
                        (next_label_position - position - time_label.len() as f64).max(0.0) as usize;
                    if space_to_next > 0 {
                        label_spans.push(Span::raw(" ".repeat(space_to_next)));
                    }

                    position = next_label_position;
                }
            }

            lines.push(Line::from(label_spans));
        }

        // Ligne 3 : Dates aux changements de jour
        let mut date_spans = vec![Span::raw(format!(
            "{:>width$}",
            "",
            width = self.y_axis_width as usize
        ))];

        let mut current_position = 0.0;
        let mut last_day = None;
        let mut last_date_end_position = 0.0;

        for (i, candle) in visible.iter().enumerate() {
            let current_day = Self::candle_datetime(candle).date_naive();

            // Première barre : toujours datée ; ensuite aux changements de jour
            let is_day_change = match last_day {
                Some(prev_day) => current_day != prev_day,
                None => true,
            };

            if is_day_change {
                let candle_position = i as f64 * spacing;
                let space_from_last_date = candle_position - last_date_end_position;

                if space_from_last_date >= MIN_DATE_SPACING || last_day.is_none() {
                    // Ajoute des espaces pour arriver à cette position
                    let spaces_needed = (candle_position - current_position).max(0.0) as usize;
                    if spaces_needed > 0 {
                        date_spans.push(Span::raw(" ".repeat(spaces_needed)));
                    }

                    let date_label = Self::candle_datetime(candle).format("%d/%m").to_string();
                    date_spans.push(Span::styled(date_label.clone(), label_style));

                    current_position = candle_position + date_label.len() as f64;
                    last_date_end_position = current_position;
                }
            }

            last_day = Some(current_day);
        }

        lines.push(Line::from(date_spans));

        lines
    }
}

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine le graphique en chandeliers du widget
pub fn render_chart(frame: &mut Frame, chart: &Chart, area: Rect) {
    if chart.series.is_empty() {
        render_empty_chart(frame, chart, area);
        return;
    }

    // Vérifie si le terminal est assez large pour afficher le graphique
    // CONCEPT : Graceful degradation pour terminaux étroits
    if area.width < MIN_TERMINAL_WIDTH {
        render_too_narrow(frame, chart, area);
        return;
    }

    let painter = CandlestickPainter::new(chart, area);
    let lines = painter.render_lines();

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(chart.options.background))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(chart.options.grid_color))
                .title(format!(" Renko Chart ({} barres) ", chart.series.len())),
        );

    frame.render_widget(paragraph, area);
}

/// Dessine la surface du graphique sans aucun point
///
/// Sert pour la séquence vide comme pour l'état d'échec : la surface
/// existe, elle est juste non rendue, sans message d'erreur visible.
pub fn render_empty_chart(frame: &mut Frame, chart: &Chart, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(chart.options.grid_color))
        .style(Style::default().bg(chart.options.background))
        .title(" Renko Chart ");

    frame.render_widget(block, area);
}

/// Affiche un message quand le terminal est trop étroit
///
/// CONCEPT : Responsive design - graceful degradation
/// - Prévient les problèmes d'affichage sur terminaux très étroits
/// - Informe clairement l'utilisateur de la largeur minimale requise
fn render_too_narrow(frame: &mut Frame, chart: &Chart, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(chart.options.background))
        .title(" ⚠ Terminal trop petit ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Terminal trop étroit pour afficher le graphique",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Largeur minimale requise : {} colonnes", MIN_TERMINAL_WIDTH),
            Style::default().fg(chart.options.text_color),
        )),
    ];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
