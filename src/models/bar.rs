// ============================================================================
// Structure : Candle (chandelle transformée)
// ============================================================================
// Représente une barre de prix telle que consommée par le graphique :
// timestamp Unix en secondes + prix OHLC en flottants
//
// CONCEPTS RUST :
// 1. i64 : timestamp Unix en secondes (format attendu par le graphique)
// 2. f64 : floating point 64 bits pour les prix (précision suffisante)
// 3. Struct plate : aucune référence, Copy serait possible mais Clone suffit
// ============================================================================

use serde::{Deserialize, Serialize};

/// Une barre de prix transformée, prête à être affichée
///
/// C'est la forme consommée par la série en chandeliers :
/// - `time` : secondes depuis l'epoch Unix (et non une date ISO)
/// - `open/high/low/close` : flottants (et non des strings numériques)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Timestamp Unix en secondes
    pub time: i64,

    /// Prix d'ouverture (Open)
    pub open: f64,

    /// Prix le plus haut (High)
    pub high: f64,

    /// Prix le plus bas (Low)
    pub low: f64,

    /// Prix de clôture (Close)
    pub close: f64,
}

impl Candle {
    /// Constructeur : crée une nouvelle barre transformée
    pub fn new(time: i64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
        }
    }

    /// Vérifie si la barre est haussière (bullish)
    ///
    /// CONCEPT RUST : &self (référence immutable)
    /// - Ne modifie pas l'objet
    /// - Pas de copie, juste une référence
    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Vérifie si la barre est baissière (bearish)
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Calcule le corps de la chandelle (body)
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// Calcule la mèche haute (upper wick)
    pub fn upper_wick(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// Calcule la mèche basse (lower wick)
    pub fn lower_wick(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// Variation en pourcentage depuis l'ouverture
    pub fn change_percent(&self) -> f64 {
        if self.open == 0.0 {
            0.0
        } else {
            ((self.close - self.open) / self.open) * 100.0
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candle_bullish() {
        let candle = Candle::new(1_735_689_600, 100.0, 110.0, 95.0, 105.0);
        assert!(candle.is_bullish());
        assert!(!candle.is_bearish());
    }

    #[test]
    fn test_candle_bearish() {
        let candle = Candle::new(1_735_689_600, 100.0, 105.0, 90.0, 95.0);
        assert!(candle.is_bearish());
        assert!(!candle.is_bullish());
    }

    #[test]
    fn test_candle_wicks() {
        let candle = Candle::new(0, 100.0, 110.0, 95.0, 105.0);
        assert_eq!(candle.body(), 5.0);
        assert_eq!(candle.upper_wick(), 5.0);
        assert_eq!(candle.lower_wick(), 5.0);
    }

    #[test]
    fn test_change_percent() {
        let candle = Candle::new(0, 100.0, 110.0, 95.0, 105.0);
        assert_eq!(candle.change_percent(), 5.0);

        // Open à zéro : pas de division par zéro
        let degenerate = Candle::new(0, 0.0, 1.0, 0.0, 1.0);
        assert_eq!(degenerate.change_percent(), 0.0);
    }
}
