// ============================================================================
// API Client : endpoint /renko-data
// ============================================================================
// Récupère les barres de prix depuis le serveur local et les transforme
// dans la forme attendue par le graphique (timestamp Unix + flottants)
//
// CONCEPTS RUST AVANCÉS :
// 1. async/await : programmation asynchrone (non-bloquante)
// 2. Result<T, E> : gestion d'erreurs avec contexte
// 3. Serde : désérialisation JSON automatique, enums untagged
// 4. Séparation fetch / parse : le parsing est testable sans réseau
// ============================================================================

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::models::Candle;

/// URL de base du serveur local qui expose /renko-data
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

// ============================================================================
// Structures pour parser la réponse JSON de l'endpoint
// ============================================================================
// Le serveur retourne soit un tableau nu de barres, soit une enveloppe
// {"renko": [...]}. On définit des structures qui matchent exactement les
// deux formes pour que serde puisse désérialiser automatiquement
//
// CONCEPT RUST : #[serde(untagged)]
// - Serde essaie chaque variant dans l'ordre jusqu'à ce qu'un matche
// - Permet d'accepter plusieurs formes de JSON avec un seul type
// ============================================================================

/// Réponse complète de l'endpoint /renko-data
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RenkoPayload {
    /// Forme enveloppée : {"renko": [ ... ]}
    Enveloped { renko: Vec<RenkoBar> },

    /// Forme nue : [ ... ]
    Bare(Vec<RenkoBar>),
}

impl RenkoPayload {
    /// Extrait la séquence de barres quelle que soit la forme
    fn into_bars(self) -> Vec<RenkoBar> {
        match self {
            RenkoPayload::Enveloped { renko } => renko,
            RenkoPayload::Bare(bars) => bars,
        }
    }
}

/// Une barre de prix telle qu'émise par le serveur
///
/// - `date` : string ISO-8601 (naïve, ou avec offset explicite)
/// - prix : nombres JSON ou strings numériques ("123.45")
#[derive(Debug, Deserialize)]
struct RenkoBar {
    date: String,
    open: PriceField,
    high: PriceField,
    low: PriceField,
    close: PriceField,
}

/// Un champ de prix : nombre JSON ou string numérique
///
/// CONCEPT RUST : Enum untagged pour champs polymorphes
/// - Number(f64) : le serveur a émis un nombre
/// - Text(String) : le serveur a émis "123.45"
/// - Les deux formes doivent produire exactement le même flottant
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceField {
    Number(f64),
    Text(String),
}

impl PriceField {
    /// Convertit le champ en f64
    fn as_f64(&self) -> Result<f64> {
        match self {
            PriceField::Number(value) => Ok(*value),
            PriceField::Text(text) => text
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Valeur de prix invalide : {:?}", text)),
        }
    }
}

impl RenkoBar {
    /// Transforme la barre brute en barre consommable par le graphique
    ///
    /// C'est LA transformation du système :
    /// { date ISO, prix strings } → { time: secondes epoch, prix: f64 }
    fn to_candle(&self) -> Result<Candle> {
        Ok(Candle {
            time: parse_iso_seconds(&self.date)?,
            open: self.open.as_f64()?,
            high: self.high.as_f64()?,
            low: self.low.as_f64()?,
            close: self.close.as_f64()?,
        })
    }
}

// ============================================================================
// Fonctions publiques de l'API
// ============================================================================

/// Récupère et transforme les barres depuis l'endpoint /renko-data
///
/// CONCEPT RUST : async fn
/// - Fonction asynchrone qui peut être "await"ée
/// - Ne bloque pas le thread pendant les I/O (network)
/// - Retourne une Future qui doit être .await pour obtenir le résultat
///
/// Un seul GET, sans paramètres ni body. Toute erreur (réseau, statut HTTP,
/// parsing JSON, transformation) remonte au même titre : l'appelant n'a
/// qu'un seul chemin d'échec à logger.
///
/// # Arguments
/// * `base_url` - URL de base du serveur (ex: "http://127.0.0.1:8000")
///
/// # Retourne
/// * `Result<Vec<Candle>>` - Barres transformées, dans l'ordre du serveur
///
/// CONCEPT RUST : #[instrument]
/// - Macro tracing qui ajoute automatiquement un span
/// - Tous les logs à l'intérieur auront le contexte base_url
#[instrument]
pub async fn fetch_renko_bars(base_url: &str) -> Result<Vec<Candle>> {
    let url = format!("{}/renko-data", base_url.trim_end_matches('/'));
    debug!(url = %url, "Built renko endpoint URL");

    debug!("Creating HTTP client");
    let client = reqwest::Client::builder()
        .build()
        .context("Échec de la création du client HTTP")?;

    debug!("Sending HTTP request to renko endpoint");
    let response = client
        .get(&url)
        .send()
        .await
        .context("Échec de la requête HTTP vers /renko-data")?;

    let status = response.status();
    debug!(status = %status, "Received HTTP response");

    // Vérifie que la réponse est un succès HTTP (200-299)
    if !status.is_success() {
        error!(status = %status, "Renko endpoint returned error status");
        anyhow::bail!("Le serveur a retourné une erreur : HTTP {}", status);
    }

    // Récupère le corps brut puis parse : le parsing reste une fonction pure
    let body = response
        .text()
        .await
        .context("Échec de la lecture du corps de la réponse")?;

    let candles = parse_renko_payload(&body)?;

    info!(bars = candles.len(), "Successfully fetched renko bars");
    Ok(candles)
}

/// Parse le corps JSON de la réponse et transforme chaque barre
///
/// CONCEPT RUST : collect::<Result<Vec<_>>>()
/// - Transforme un itérateur de Result en Result de Vec
/// - S'arrête à la première erreur : tout ou rien, pas de barre partielle
///
/// Une séquence vide est valide : le graphique s'affiche sans points.
pub fn parse_renko_payload(body: &str) -> Result<Vec<Candle>> {
    debug!("Parsing JSON response");
    let payload: RenkoPayload =
        serde_json::from_str(body).context("Échec du parsing JSON de la réponse /renko-data")?;

    let bars = payload.into_bars();
    debug!(bar_count = bars.len(), "Received bars from endpoint");

    let candles = bars
        .iter()
        .map(RenkoBar::to_candle)
        .collect::<Result<Vec<Candle>>>()?;

    if candles.is_empty() {
        warn!("Renko endpoint returned no bars");
    }

    debug!(parsed = candles.len(), "Finished transforming renko bars");
    Ok(candles)
}

/// Convertit une date ISO-8601 en secondes depuis l'epoch Unix
///
/// CONCEPT : Deux formes de dates en entrée
/// - Avec offset : "2025-01-01T00:00:00+00:00" (RFC 3339 complet)
/// - Naïve : "2025-01-01T00:00:00" (forme réellement émise par le serveur,
///   interprétée comme UTC)
fn parse_iso_seconds(date: &str) -> Result<i64> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(date) {
        return Ok(datetime.timestamp());
    }

    let naive = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f")
        .with_context(|| format!("Date ISO-8601 invalide : {:?}", date))?;

    Ok(naive.and_utc().timestamp())
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_seconds_naive() {
        // 2025-01-01T00:00:00 UTC = 1735689600
        assert_eq!(parse_iso_seconds("2025-01-01T00:00:00").unwrap(), 1_735_689_600);
        // Fraction de seconde tronquée
        assert_eq!(
            parse_iso_seconds("2025-01-01T00:00:00.500").unwrap(),
            1_735_689_600
        );
    }

    #[test]
    fn test_parse_iso_seconds_with_offset() {
        assert_eq!(
            parse_iso_seconds("2025-01-01T00:00:00+00:00").unwrap(),
            1_735_689_600
        );
        // Offset de +01:00 : une heure plus tôt en UTC
        assert_eq!(
            parse_iso_seconds("2025-01-01T01:00:00+01:00").unwrap(),
            1_735_689_600
        );
    }

    #[test]
    fn test_parse_iso_seconds_invalid() {
        assert!(parse_iso_seconds("pas-une-date").is_err());
        assert!(parse_iso_seconds("").is_err());
    }

    #[test]
    fn test_price_field_text_and_number_agree() {
        let text = PriceField::Text("123.45".to_string());
        let number = PriceField::Number(123.45);

        assert_eq!(text.as_f64().unwrap(), 123.45);
        assert_eq!(text.as_f64().unwrap(), number.as_f64().unwrap());
        assert!(PriceField::Text("abc".to_string()).as_f64().is_err());
    }

    #[test]
    fn test_parse_enveloped_payload() {
        let body = r#"{"renko": [
            {"date": "2025-01-01T00:00:00", "open": "100.5", "high": "101.0", "low": "99.5", "close": "100.0"},
            {"date": "2025-01-01T01:00:00", "open": 100.0, "high": 102.0, "low": 100.0, "close": 102.0}
        ]}"#;

        let candles = parse_renko_payload(body).unwrap();
        assert_eq!(candles.len(), 2);

        // Transformation exacte : date ISO → secondes epoch, string → f64
        assert_eq!(candles[0].time, 1_735_689_600);
        assert_eq!(candles[0].open, 100.5);
        assert_eq!(candles[0].close, 100.0);

        // Les barres sortent dans l'ordre d'entrée
        assert_eq!(candles[1].time, 1_735_693_200);
        assert_eq!(candles[1].close, 102.0);
    }

    #[test]
    fn test_parse_bare_payload() {
        let body = r#"[
            {"date": "2025-01-01T00:00:00", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5}
        ]"#;

        let candles = parse_renko_payload(body).unwrap();
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].high, 2.0);
    }

    #[test]
    fn test_parse_empty_payload() {
        // Séquence vide : valide, le graphique s'affiche sans points
        let candles = parse_renko_payload(r#"{"renko": []}"#).unwrap();
        assert!(candles.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_renko_payload("pas du json").is_err());
        assert!(parse_renko_payload(r#"{"renko": "oops"}"#).is_err());
    }

    #[test]
    fn test_parse_preserves_count_and_order() {
        // N barres en entrée → N barres en sortie, même ordre
        let bars: Vec<String> = (0..5)
            .map(|i| {
                format!(
                    r#"{{"date": "2025-01-01T0{}:00:00", "open": {}.0, "high": {}.5, "low": {}.0, "close": {}.2}}"#,
                    i,
                    100 + i,
                    101 + i,
                    99 + i,
                    100 + i
                )
            })
            .collect();
        let body = format!(r#"{{"renko": [{}]}}"#, bars.join(","));

        let candles = parse_renko_payload(&body).unwrap();
        assert_eq!(candles.len(), 5);
        for window in candles.windows(2) {
            assert!(window[0].time < window[1].time);
        }
    }

    // Test async nécessite tokio test runtime
    // CONCEPT RUST : #[tokio::test]
    // - Macro qui setup un runtime tokio pour le test
    // - Permet d'utiliser .await dans les tests
    #[tokio::test]
    async fn test_fetch_renko_bars_unreachable() {
        // Port fermé : l'erreur réseau doit remonter proprement, sans panic
        let result = fetch_renko_bars("http://127.0.0.1:1").await;
        assert!(result.is_err());
    }
}
