//! Normalisation of raw backend JSON into canonical records.
//!
//! The upstream API is inconsistent: the same quantity may arrive under
//! several names (`alerta` or `nivelAlerta`), as a number or a numeric
//! string, nested or flat (`redes.twitter` or `twitter`), or not at all.
//! Each canonical field is described by a [`FieldSpec`]: an ordered list of
//! alias paths plus a default. Resolution takes the first alias that is
//! present, non-null and convertible to the field's kind; otherwise the
//! default. The canonical camelCase name is always the last alias, so a
//! serialised canonical record normalises to itself.
//!
//! Nothing here fails. Missing or malformed input yields defaults or an
//! empty collection.

use std::collections::HashMap;

use ring::digest;
use serde_json::Value;
use tracing::debug;

use crate::types::{
    Bill, Deputy, DeputyId, GlobalStats, Level, PartyStats, SocialLinks, Vote, VoteRecord,
};

/// Ordered alias paths and default for one canonical field.
///
/// Paths are dotted (`redes.twitter`) to reach into nested objects.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec<T> {
    pub aliases: &'static [&'static str],
    pub default: T,
}

// ── Deputy field table ──

pub mod deputy {
    use super::FieldSpec;

    pub const ID: &[&str] = &["dipId", "id"];
    pub const NAME: FieldSpec<&str> = FieldSpec {
        aliases: &["nombre", "name"],
        default: "Sin nombre",
    };
    pub const PARTY_CODE: FieldSpec<&str> = FieldSpec {
        aliases: &["partido", "partyCode"],
        default: "IND",
    };
    pub const PARTY_NAME: FieldSpec<&str> = FieldSpec {
        aliases: &["partidoNombre", "partyName", "partido", "partyCode"],
        default: "Independiente",
    };
    /// Default comes from the party colour table, keyed by the resolved code.
    pub const PARTY_COLOR: &[&str] = &["partidoColor", "partyColor"];
    pub const REGION: FieldSpec<&str> = FieldSpec {
        aliases: &["distrito", "region"],
        default: "",
    };
    pub const ALERT_LEVEL: FieldSpec<i64> = FieldSpec {
        aliases: &["alerta", "nivelAlerta", "alertLevel"],
        default: 0,
    };
    pub const ATTENDANCE: FieldSpec<i64> = FieldSpec {
        aliases: &["asistencia", "attendance"],
        default: 0,
    };
    pub const TOTAL_VOTES: FieldSpec<i64> = FieldSpec {
        aliases: &["votaciones", "votacionesTotal", "totalVotes"],
        default: 0,
    };
    pub const VOTES_FOR: FieldSpec<i64> = FieldSpec {
        aliases: &["aFavor", "votesFor"],
        default: 0,
    };
    pub const VOTES_AGAINST: FieldSpec<i64> = FieldSpec {
        aliases: &["enContra", "votesAgainst"],
        default: 0,
    };
    pub const ABSTENTIONS: FieldSpec<i64> = FieldSpec {
        aliases: &["abstencion", "abstentions"],
        default: 0,
    };
    pub const TWITTER: FieldSpec<&str> = FieldSpec {
        aliases: &["redes.twitter", "twitter", "socialLinks.twitter"],
        default: "",
    };
    pub const INSTAGRAM: FieldSpec<&str> = FieldSpec {
        aliases: &["redes.instagram", "instagram", "socialLinks.instagram"],
        default: "",
    };
    pub const EMAIL: FieldSpec<&str> = FieldSpec {
        aliases: &["correo", "email", "socialLinks.email"],
        default: "",
    };
    pub const INCONSISTENCIES: &[&str] =
        &["contradiccionesDetalle", "inconsistencias", "inconsistencies"];
    pub const VOTING_HISTORY: &[&str] = &["votacionesDetalle", "votaciones", "votingHistory"];

    pub const VOTE_TITLE: FieldSpec<&str> = FieldSpec {
        aliases: &["titulo", "proyecto", "title"],
        default: "",
    };
    pub const VOTE_VALUE: &[&str] = &["voto", "vote"];
    pub const VOTE_DATE: FieldSpec<&str> = FieldSpec {
        aliases: &["fecha", "date"],
        default: "",
    };
}

// ── Statistics field tables ──

pub mod stats {
    use super::FieldSpec;

    pub const TOTAL_DEPUTIES: FieldSpec<i64> = FieldSpec {
        aliases: &["totalDiputados", "totalDeputies"],
        default: 0,
    };
    pub const HIGH_ALERTS: FieldSpec<i64> = FieldSpec {
        aliases: &["alertasAltas", "highAlerts"],
        default: 0,
    };
    pub const MEDIUM_ALERTS: FieldSpec<i64> = FieldSpec {
        aliases: &["alertasMedias", "mediumAlerts"],
        default: 0,
    };
    pub const VOTES_ANALYZED: FieldSpec<i64> = FieldSpec {
        aliases: &["votacionesAnalizadas", "contradicciones", "votesAnalyzed"],
        default: 0,
    };
    pub const AVERAGE_ATTENDANCE: FieldSpec<i64> = FieldSpec {
        aliases: &["asistenciaPromedio", "promedioAlerta", "averageAttendance"],
        default: 0,
    };
    pub const LAST_UPDATED: &[&str] = &["ultimaActualizacion", "lastUpdated"];
}

pub mod party {
    use super::FieldSpec;

    pub const CODE: FieldSpec<&str> = FieldSpec {
        aliases: &["sigla", "partido", "code"],
        default: "IND",
    };
    /// Defaults to the resolved code.
    pub const NAME: &[&str] = &["nombre", "partidoNombre", "name"];
    pub const COLOR: &[&str] = &["color", "partidoColor"];
    pub const COUNT: FieldSpec<i64> = FieldSpec {
        aliases: &["count", "diputados"],
        default: 0,
    };
    pub const AVERAGE_ALERT: FieldSpec<f64> = FieldSpec {
        aliases: &["alertaPromedio", "averageAlert"],
        default: 0.0,
    };
}

pub mod bill {
    use super::FieldSpec;

    pub const BULLETIN: FieldSpec<&str> = FieldSpec {
        aliases: &["boletin", "bulletin"],
        default: "",
    };
    pub const TITLE: FieldSpec<&str> = FieldSpec {
        aliases: &["titulo", "title"],
        default: "",
    };
    pub const TOPIC: FieldSpec<&str> = FieldSpec {
        aliases: &["tema", "topic"],
        default: "General",
    };
    pub const PRIORITY: &[&str] = &["prioridad", "priority"];
    pub const CITIZEN_IMPACT: &[&str] = &["impactoCiudadania", "citizenImpact"];
    pub const URL: FieldSpec<&str> = FieldSpec {
        aliases: &["url", "link"],
        default: "",
    };
}

/// Party code → display colour.
const PARTY_COLORS: &[(&str, &str)] = &[
    ("RN", "#1e40af"),
    ("UDI", "#1e3a5f"),
    ("PS", "#dc2626"),
    ("PPD", "#f59e0b"),
    ("PC", "#b91c1c"),
    ("DC", "#16a34a"),
    ("REP", "#0d47a1"),
    ("PREP", "#0d47a1"),
    ("EVOP", "#0891b2"),
    ("FA", "#7c3aed"),
    ("IND", "#6b7280"),
    ("RD", "#ec4899"),
    ("CS", "#0ea5e9"),
    ("PSC", "#059669"),
    ("LIBERAL", "#eab308"),
    ("PNL", "#14532d"),
    ("PDG", "#f97316"),
];

const UNKNOWN_PARTY_COLOR: &str = "#6b7280";

const AFFIRMATIVE: &[&str] = &["afirmativo", "favor", "si", "sí", "yes"];
const NEGATIVE: &[&str] = &["negativo", "contra", "against", "no"];

/// Colour for a party code, grey when the code is unknown.
pub fn party_color(code: &str) -> &'static str {
    PARTY_COLORS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, color)| *color)
        .unwrap_or(UNKNOWN_PARTY_COLOR)
}

/// Map a free-form vote label into the closed [`Vote`] set.
///
/// Lower-cases, then checks affirmative keywords before negative ones;
/// anything else (including the empty string) is an abstention.
pub fn normalize_vote(raw: &str) -> Vote {
    let v = raw.to_lowercase();
    if AFFIRMATIVE.iter().any(|k| v.contains(k)) {
        Vote::Favor
    } else if NEGATIVE.iter().any(|k| v.contains(k)) {
        Vote::Against
    } else {
        Vote::Abstain
    }
}

/// Error message carried by an upstream `{"error": ...}` payload, if any.
pub fn upstream_error(raw: &Value) -> Option<String> {
    match raw.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ── Collections ──

/// Normalise a deputies payload. Anything other than an array yields an empty list.
///
/// Derived ids that collide within the payload get `-2`, `-3`, … suffixes
/// in input order.
pub fn normalize_deputies(raw: &Value) -> Vec<Deputy> {
    let Some(items) = raw.as_array() else {
        debug!(kind = kind_of(raw), "deputies payload is not an array");
        return Vec::new();
    };

    let mut seen: HashMap<String, usize> = HashMap::new();
    items
        .iter()
        .map(|item| {
            let (mut dep, derived) = resolve_deputy(item);
            if derived && let DeputyId::Text(id) = &dep.id {
                let n = seen.entry(id.clone()).or_insert(0);
                *n += 1;
                if *n > 1 {
                    dep.id = DeputyId::Text(format!("{id}-{n}"));
                }
            }
            dep
        })
        .collect()
}

/// Normalise a single deputy record.
pub fn normalize_deputy(raw: &Value) -> Deputy {
    resolve_deputy(raw).0
}

/// Normalise the global statistics payload. Non-objects yield zeroed stats.
pub fn normalize_stats(raw: &Value) -> GlobalStats {
    if !raw.is_object() {
        debug!(kind = kind_of(raw), "stats payload is not an object");
        return GlobalStats::default();
    }
    GlobalStats {
        total_deputies: resolve_count(raw, &stats::TOTAL_DEPUTIES),
        high_alerts: resolve_count(raw, &stats::HIGH_ALERTS),
        medium_alerts: resolve_count(raw, &stats::MEDIUM_ALERTS),
        votes_analyzed: resolve_count(raw, &stats::VOTES_ANALYZED),
        average_attendance: resolve_count(raw, &stats::AVERAGE_ATTENDANCE),
        last_updated: resolve(raw, stats::LAST_UPDATED, as_text),
    }
}

/// Normalise the per-party statistics payload. Non-arrays yield an empty list.
pub fn normalize_party_stats(raw: &Value) -> Vec<PartyStats> {
    let Some(items) = raw.as_array() else {
        debug!(kind = kind_of(raw), "party stats payload is not an array");
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let code = resolve_text(item, &party::CODE);
            PartyStats {
                name: resolve(item, party::NAME, as_text).unwrap_or_else(|| code.clone()),
                color: resolve(item, party::COLOR, as_text)
                    .unwrap_or_else(|| party_color(&code).to_string()),
                count: resolve_count(item, &party::COUNT),
                average_alert: resolve(item, party::AVERAGE_ALERT.aliases, as_float)
                    .unwrap_or(party::AVERAGE_ALERT.default),
                code,
            }
        })
        .collect()
}

/// Normalise a bills payload. Non-arrays yield an empty list.
pub fn normalize_bills(raw: &Value) -> Vec<Bill> {
    let Some(items) = raw.as_array() else {
        debug!(kind = kind_of(raw), "bills payload is not an array");
        return Vec::new();
    };
    items
        .iter()
        .map(|item| Bill {
            bulletin: resolve_text(item, &bill::BULLETIN),
            title: resolve_text(item, &bill::TITLE),
            topic: resolve_text(item, &bill::TOPIC),
            priority: resolve(item, bill::PRIORITY, as_level),
            citizen_impact: resolve(item, bill::CITIZEN_IMPACT, as_level),
            url: resolve_text(item, &bill::URL),
        })
        .collect()
}

// ── Deputy resolution ──

/// Returns the deputy and whether its id was derived from content.
fn resolve_deputy(raw: &Value) -> (Deputy, bool) {
    let name = resolve_text(raw, &deputy::NAME);
    let party_code = resolve_text(raw, &deputy::PARTY_CODE);
    let region = resolve_text(raw, &deputy::REGION);

    let (id, derived) = match resolve(raw, deputy::ID, as_id) {
        Some(id) => (id, false),
        None => (derive_id(&name, &party_code, &region), true),
    };

    let dep = Deputy {
        id,
        party_name: resolve_text(raw, &deputy::PARTY_NAME),
        party_color: resolve(raw, deputy::PARTY_COLOR, as_text)
            .unwrap_or_else(|| party_color(&party_code).to_string()),
        alert_level: resolve_int(raw, &deputy::ALERT_LEVEL).clamp(0, 10) as u8,
        attendance: resolve_int(raw, &deputy::ATTENDANCE).clamp(0, 100) as u8,
        total_votes: resolve_count(raw, &deputy::TOTAL_VOTES),
        votes_for: resolve_count(raw, &deputy::VOTES_FOR),
        votes_against: resolve_count(raw, &deputy::VOTES_AGAINST),
        abstentions: resolve_count(raw, &deputy::ABSTENTIONS),
        social_links: SocialLinks {
            twitter: resolve_text(raw, &deputy::TWITTER),
            instagram: resolve_text(raw, &deputy::INSTAGRAM),
            email: resolve_text(raw, &deputy::EMAIL),
        },
        inconsistencies: resolve(raw, deputy::INCONSISTENCIES, as_list)
            .map(|items| items.iter().filter_map(as_text).collect())
            .unwrap_or_default(),
        voting_history: resolve(raw, deputy::VOTING_HISTORY, as_list)
            .map(|items| items.iter().map(resolve_vote_record).collect())
            .unwrap_or_default(),
        name,
        party_code,
        region,
    };
    (dep, derived)
}

fn resolve_vote_record(raw: &Value) -> VoteRecord {
    let vote = match resolve(raw, deputy::VOTE_VALUE, Some) {
        Some(Value::String(s)) => normalize_vote(s),
        _ => Vote::Abstain,
    };
    VoteRecord {
        title: resolve_text(raw, &deputy::VOTE_TITLE),
        vote,
        date: resolve_text(raw, &deputy::VOTE_DATE),
    }
}

/// Content-derived id: `d-` + 12 hex chars of SHA-256 over name, party and region.
fn derive_id(name: &str, party_code: &str, region: &str) -> DeputyId {
    let mut ctx = digest::Context::new(&digest::SHA256);
    ctx.update(name.as_bytes());
    ctx.update(b"\0");
    ctx.update(party_code.as_bytes());
    ctx.update(b"\0");
    ctx.update(region.as_bytes());
    let hash = ctx.finish();
    let hex: String = hash
        .as_ref()
        .iter()
        .take(6)
        .map(|b| format!("{b:02x}"))
        .collect();
    DeputyId::Text(format!("d-{hex}"))
}

// ── Alias resolution ──

fn lookup<'a>(raw: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(raw, |v, key| v.get(key))
        .filter(|v| !v.is_null())
}

/// First alias that is present and converts; `None` if none do.
fn resolve<'a, T>(
    raw: &'a Value,
    aliases: &[&str],
    convert: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    aliases
        .iter()
        .find_map(|path| lookup(raw, path).and_then(&convert))
}

fn resolve_text(raw: &Value, spec: &FieldSpec<&'static str>) -> String {
    resolve(raw, spec.aliases, as_text).unwrap_or_else(|| spec.default.to_string())
}

fn resolve_int(raw: &Value, spec: &FieldSpec<i64>) -> i64 {
    resolve(raw, spec.aliases, as_int).unwrap_or(spec.default)
}

fn resolve_count(raw: &Value, spec: &FieldSpec<i64>) -> u32 {
    resolve_int(raw, spec).clamp(0, u32::MAX as i64) as u32
}

// ── Kind conversions ──

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_float(v: &Value) -> Option<f64> {
    let f = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    f.filter(|f| f.is_finite())
}

fn as_int(v: &Value) -> Option<i64> {
    if let Value::Number(n) = v
        && let Some(i) = n.as_i64()
    {
        return Some(i);
    }
    if let Value::String(s) = v
        && let Ok(i) = s.trim().parse::<i64>()
    {
        return Some(i);
    }
    as_float(v).map(|f| f.round() as i64)
}

fn as_list(v: &Value) -> Option<&Vec<Value>> {
    v.as_array()
}

fn as_id(v: &Value) -> Option<DeputyId> {
    match v {
        Value::Number(n) => n.as_i64().map(DeputyId::Num).or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| DeputyId::Num(f as i64))
        }),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn as_level(v: &Value) -> Option<Level> {
    v.as_str().and_then(Level::parse)
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_alert_defaults_to_zero() {
        let raws = [
            json!({}),
            json!({"nombre": "Karol Cariola"}),
            json!({"alerta": null}),
            json!({"nivelAlerta": null, "partido": "PC"}),
            json!("not an object"),
        ];
        for raw in &raws {
            assert_eq!(normalize_deputy(raw).alert_level, 0, "input {raw}");
        }
    }

    #[test]
    fn alert_alias_priority() {
        let dep = normalize_deputy(&json!({"alerta": 8, "nivelAlerta": 3}));
        assert_eq!(dep.alert_level, 8);
        let dep = normalize_deputy(&json!({"alerta": null, "nivelAlerta": 3}));
        assert_eq!(dep.alert_level, 3);
    }

    #[test]
    fn scores_are_clamped() {
        let dep = normalize_deputy(&json!({"alerta": 14, "asistencia": 130, "aFavor": -3}));
        assert_eq!(dep.alert_level, 10);
        assert_eq!(dep.attendance, 100);
        assert_eq!(dep.votes_for, 0);

        let dep = normalize_deputy(&json!({"alerta": -2, "asistencia": "87.6"}));
        assert_eq!(dep.alert_level, 0);
        assert_eq!(dep.attendance, 88);
    }

    #[test]
    fn defaults_for_empty_record() {
        let dep = normalize_deputy(&json!({}));
        assert_eq!(dep.name, "Sin nombre");
        assert_eq!(dep.party_code, "IND");
        assert_eq!(dep.party_name, "Independiente");
        assert_eq!(dep.party_color, "#6b7280");
        assert_eq!(dep.region, "");
        assert_eq!(dep.total_votes, 0);
        assert!(dep.social_links.is_empty());
        assert!(dep.inconsistencies.is_empty());
        assert!(dep.voting_history.is_empty());
    }

    #[test]
    fn party_name_falls_back_to_code() {
        let dep = normalize_deputy(&json!({"partido": "PS"}));
        assert_eq!(dep.party_name, "PS");
        assert_eq!(dep.party_color, "#dc2626");
    }

    #[test]
    fn nested_social_links_take_priority() {
        let dep = normalize_deputy(&json!({
            "redes": {"twitter": "@nested"},
            "twitter": "@flat",
            "instagram": "insta",
            "correo": "a@b.cl",
            "email": "other@b.cl",
        }));
        assert_eq!(dep.social_links.twitter, "@nested");
        assert_eq!(dep.social_links.instagram, "insta");
        assert_eq!(dep.social_links.email, "a@b.cl");
    }

    #[test]
    fn votaciones_feeds_total_or_history_by_kind() {
        let dep = normalize_deputy(&json!({"votaciones": 64}));
        assert_eq!(dep.total_votes, 64);
        assert!(dep.voting_history.is_empty());

        let dep = normalize_deputy(&json!({"votaciones": [{"titulo": "Ley 40 Horas", "voto": "Si"}]}));
        assert_eq!(dep.total_votes, 0);
        assert_eq!(dep.voting_history.len(), 1);
        assert_eq!(dep.voting_history[0].vote, Vote::Favor);
    }

    #[test]
    fn undefined_alert_with_affirmative_vote() {
        let dep = normalize_deputy(&json!({"votaciones": [{"voto": "Afirmativo"}]}));
        assert_eq!(dep.alert_level, 0);
        assert_eq!(
            dep.voting_history,
            vec![VoteRecord {
                title: String::new(),
                vote: Vote::Favor,
                date: String::new(),
            }]
        );
    }

    #[test]
    fn vote_record_aliases() {
        let dep = normalize_deputy(&json!({
            "votacionesDetalle": [
                {"proyecto": "Presupuesto 2026", "voto": "En contra", "fecha": "2025-12-20"},
                {"titulo": "Reforma", "voto": 1},
                "garbage",
            ]
        }));
        let h = &dep.voting_history;
        assert_eq!(h.len(), 3);
        assert_eq!(h[0].title, "Presupuesto 2026");
        assert_eq!(h[0].vote, Vote::Against);
        assert_eq!(h[0].date, "2025-12-20");
        assert_eq!(h[1].vote, Vote::Abstain);
        assert_eq!(h[2].title, "");
    }

    #[test]
    fn normalize_vote_keywords() {
        for s in ["favor", "A FAVOR", "Afirmativo", "si", "Sí", "yes"] {
            assert_eq!(normalize_vote(s), Vote::Favor, "{s}");
        }
        for s in ["contra", "En Contra", "NEGATIVO", "no", "against"] {
            assert_eq!(normalize_vote(s), Vote::Against, "{s}");
        }
        for s in ["", "abstain", "abstencion", "pareo", "ausente"] {
            assert_eq!(normalize_vote(s), Vote::Abstain, "{s}");
        }
    }

    #[test]
    fn normalize_vote_is_stable_on_canonical_labels() {
        for v in [Vote::Favor, Vote::Against, Vote::Abstain] {
            assert_eq!(normalize_vote(v.as_str()), v);
        }
    }

    #[test]
    fn source_id_is_kept() {
        assert_eq!(normalize_deputy(&json!({"id": 12})).id, DeputyId::Num(12));
        assert_eq!(
            normalize_deputy(&json!({"dipId": "D1054", "id": 3})).id,
            DeputyId::Text("D1054".into())
        );
    }

    #[test]
    fn numeric_string_id_becomes_num() {
        let dep = normalize_deputy(&json!({"dipId": "1054", "nombre": "Jaime Sáez"}));
        assert_eq!(dep.id, DeputyId::Num(1054));

        let again = normalize_deputy(&serde_json::to_value(&dep).unwrap());
        assert_eq!(again, dep);

        assert_eq!(
            normalize_deputy(&json!({"id": "01054"})).id,
            DeputyId::Text("01054".into())
        );
    }

    #[test]
    fn derived_id_is_deterministic() {
        let raw = json!({"nombre": "Jorge Brito", "partido": "FA", "distrito": 7});
        let a = normalize_deputy(&raw);
        let b = normalize_deputy(&raw);
        assert_eq!(a.id, b.id);
        match &a.id {
            DeputyId::Text(s) => {
                assert!(s.starts_with("d-"));
                assert_eq!(s.len(), 14);
            }
            other => panic!("expected derived text id, got {other:?}"),
        }

        let other = normalize_deputy(&json!({"nombre": "Jorge Brito", "partido": "FA", "distrito": 8}));
        assert_ne!(a.id, other.id);
    }

    #[test]
    fn colliding_derived_ids_are_suffixed() {
        let deps = normalize_deputies(&json!([
            {"nombre": "Sin datos"},
            {"nombre": "Sin datos"},
            {"nombre": "Sin datos"},
        ]));
        let ids: Vec<String> = deps.iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids[1], format!("{}-2", ids[0]));
        assert_eq!(ids[2], format!("{}-3", ids[0]));
    }

    #[test]
    fn normalising_canonical_record_is_idempotent() {
        let raw = json!({
            "nombre": "Emilia Schneider",
            "partido": "FA",
            "partidoNombre": "Frente Amplio",
            "distrito": 9,
            "alerta": "6",
            "asistencia": 91,
            "votaciones": [{"titulo": "Ley 40 Horas", "voto": "Afirmativo", "fecha": "2026-01-10"}],
            "redes": {"twitter": "@emischneider"},
            "inconsistencias": ["Cambio de posición en tema tributario"],
        });
        let once = normalize_deputy(&raw);
        let twice = normalize_deputy(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn non_array_payload_yields_empty_collection() {
        assert!(normalize_deputies(&json!(null)).is_empty());
        assert!(normalize_deputies(&json!({"error": "boom"})).is_empty());
        assert!(normalize_party_stats(&json!("x")).is_empty());
        assert!(normalize_bills(&json!(3)).is_empty());
        assert_eq!(normalize_stats(&json!([1, 2])), GlobalStats::default());
    }

    #[test]
    fn stats_aliases() {
        let s = normalize_stats(&json!({
            "totalDiputados": 155,
            "alertasAltas": 12,
            "contradicciones": 40,
            "promedioAlerta": 4,
        }));
        assert_eq!(s.total_deputies, 155);
        assert_eq!(s.high_alerts, 12);
        assert_eq!(s.medium_alerts, 0);
        assert_eq!(s.votes_analyzed, 40);
        assert_eq!(s.average_attendance, 4);
        assert_eq!(s.last_updated, None);

        let again = normalize_stats(&serde_json::to_value(&s).unwrap());
        assert_eq!(again, s);
    }

    #[test]
    fn party_stats_defaults() {
        let p = normalize_party_stats(&json!([
            {"sigla": "PS", "nombre": "Partido Socialista", "count": 12, "alertaPromedio": 4.5},
            {"partido": "XYZ"},
        ]));
        assert_eq!(p[0].code, "PS");
        assert_eq!(p[0].color, "#dc2626");
        assert_eq!(p[0].count, 12);
        assert_eq!(p[0].average_alert, 4.5);
        assert_eq!(p[1].name, "XYZ");
        assert_eq!(p[1].color, "#6b7280");
        assert_eq!(p[1].count, 0);
    }

    #[test]
    fn bills_levels_and_topic_default() {
        let b = normalize_bills(&json!([
            {"boletin": "17797-06", "titulo": "Modifica ley", "prioridad": "alto", "impactoCiudadania": "medio"},
            {"boletin": "1-01", "prioridad": "urgente"},
        ]));
        assert_eq!(b[0].priority, Some(Level::High));
        assert_eq!(b[0].citizen_impact, Some(Level::Medium));
        assert_eq!(b[0].topic, "General");
        assert_eq!(b[1].priority, None);

        let again = normalize_bills(&serde_json::to_value(&b).unwrap());
        assert_eq!(again, b);
    }

    #[test]
    fn upstream_error_detection() {
        assert_eq!(
            upstream_error(&json!({"error": "quota exceeded"})),
            Some("quota exceeded".into())
        );
        assert_eq!(upstream_error(&json!({"error": null})), None);
        assert_eq!(upstream_error(&json!([])), None);
    }
}
