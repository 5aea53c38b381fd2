//! Deterministic synthetic backend used when the live API is disabled or fails.
//!
//! Records are emitted in the live backend's raw shape (Spanish keys) and go
//! through the same Normalizer as live data. All variable values come from a
//! `StdRng` seeded once, so a given seed always regenerates identical data.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

use crate::types::DeputyId;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 2022;

/// Votes analysed, as reported by the synthetic stats endpoint.
const VOTES_ANALYZED: u32 = 156;

/// Deputies listed by the synthetic alerts endpoint at most.
const MAX_ALERTS: usize = 10;

/// `(code, name)` for every party in the roster. Colours come from
/// [`party_color`](crate::normalize::party_color).
const PARTIES: &[(&str, &str)] = &[
    ("RN", "Renovación Nacional"),
    ("UDI", "Unión Demócrata Independiente"),
    ("PS", "Partido Socialista"),
    ("PPD", "Partido Por la Democracia"),
    ("PC", "Partido Comunista"),
    ("DC", "Democracia Cristiana"),
    ("PREP", "Partido Republicano"),
    ("EVOP", "Evópoli"),
    ("FA", "Frente Amplio"),
    ("IND", "Independiente"),
    ("PSC", "Partido Social Cristiano"),
    ("LIBERAL", "Partido Liberal"),
    ("PNL", "Partido Nacional Liberal"),
    ("PDG", "Partido de la Gente"),
];

/// `(name, party code, district)`.
const ROSTER: &[(&str, &str, u8)] = &[
    ("María Candelaria Acevedo", "PC", 20),
    ("Eric Aedo", "DC", 20),
    ("Yovana Ahumada", "PSC", 3),
    ("Jorge Alessandri", "UDI", 10),
    ("René Alinco", "IND", 27),
    ("Jaime Araya", "IND", 3),
    ("Cristián Araya", "PREP", 11),
    ("Mónica Arce", "IND", 12),
    ("Roberto Arroyo", "PSC", 20),
    ("Danisa Astudillo", "PS", 2),
    ("Chiara Barchiesi", "PREP", 6),
    ("Boris Barrera", "PC", 9),
    ("Héctor Barría", "DC", 25),
    ("Arturo Barrios", "PS", 7),
    ("Miguel Ángel Becker", "RN", 23),
    ("María Francisca Bello", "FA", 6),
    ("Juan Carlos Beltrán", "RN", 22),
    ("Gustavo Benavente", "UDI", 18),
    ("Bernardo Berger", "IND", 24),
    ("Alejandro Bernales", "LIBERAL", 26),
    ("Carlos Bianchi", "IND", 28),
    ("Sergio Bobadilla", "UDI", 20),
    ("Fernando Bórquez", "UDI", 26),
    ("Ana María Bravo", "PS", 24),
    ("Marta Bravo", "UDI", 19),
    ("Jorge Brito", "FA", 7),
    ("Félix Bugueño", "FA", 16),
    ("Miguel Ángel Calisto", "IND", 27),
    ("Felipe Camaño", "IND", 19),
    ("Karol Cariola", "PC", 9),
    ("Álvaro Carter", "IND", 12),
    ("Nathalie Castillo", "PC", 5),
    ("José Miguel Castro", "RN", 3),
    ("Roberto Celedón", "IND", 17),
    ("Andrés Celis", "RN", 7),
    ("Daniella Cicardini", "PS", 4),
    ("Sofía Cid", "IND", 4),
    ("Ricardo Cifuentes", "DC", 5),
    ("Juan Antonio Coloma", "UDI", 14),
    ("Sara Concha", "PSC", 19),
    ("María Luisa Cordero", "IND", 10),
    ("Eduardo Cornejo", "UDI", 16),
    ("Luis Alberto Cuello", "PC", 7),
    ("Gonzalo de la Carrera", "PNL", 11),
    ("Catalina Del Real", "IND", 11),
    ("Viviana Delgado", "IND", 8),
    ("Felipe Donoso", "UDI", 17),
    ("Jorge Durán", "RN", 9),
    ("Eduardo Durán", "RN", 13),
    ("Diego Schalper", "RN", 15),
    ("Johannes Kaiser", "PREP", 10),
    ("Pamela Jiles", "PDG", 12),
    ("Vlado Mirosevic", "LIBERAL", 1),
    ("Marcos Ilabaca", "PS", 24),
    ("Andrés Longton", "RN", 6),
    ("Jaime Sáez", "FA", 15),
    ("Erika Olivera", "IND", 14),
    ("Cristhian Moreira", "UDI", 23),
    ("Gonzalo Winter", "FA", 10),
    ("Tomás Hirsch", "FA", 8),
    ("Ximena Ossandón", "RN", 11),
    ("Francisco Undurraga", "EVOP", 9),
    ("Emilia Schneider", "FA", 9),
    ("Harry Jürgensen", "RN", 26),
    ("Carolina Marzán", "PPD", 6),
    ("Gaspar Rivas", "PREP", 15),
    ("Maite Orsini", "FA", 10),
    ("Leonardo Soto", "PS", 5),
    ("Gloria Naveillan", "IND", 8),
    ("Hotuiti Teao", "PREP", 13),
    ("Camila Rojas", "FA", 8),
    ("Diego Ibáñez", "FA", 6),
    ("Natalia Castillo", "PC", 5),
    ("Catalina Pérez", "FA", 3),
    ("Gonzalo Fuenzalida", "RN", 9),
    ("Alexis Sepúlveda", "PS", 25),
    ("José Meza", "IND", 1),
    ("Rubén Oyarzo", "IND", 28),
    ("Marcela Riquelme", "IND", 3),
    ("Joanna Pérez", "DC", 18),
    ("Lorena Fries", "FA", 9),
    ("Félix González", "FA", 8),
    ("Andrés Jouannet", "PDG", 21),
    ("Luis Malla", "PREP", 2),
    ("Hugo Rey", "RN", 16),
    ("Agustín Romero", "PREP", 27),
    ("Daniel Lilayu", "PREP", 23),
    ("Stephan Schubert", "PREP", 25),
    ("Cristián Labbé", "UDI", 13),
    ("Henry Leal", "RN", 17),
    ("Francesca Muñoz", "IND", 15),
    ("Carla Morales", "UDI", 4),
    ("Marisela Santibáñez", "PC", 10),
    ("Carmen Hertz", "PC", 10),
    ("Lorena Pizarro", "PC", 9),
    ("Boris Chamorro", "PS", 22),
    ("Jaime Naranjo", "PS", 16),
    ("Raúl Leiva", "PS", 21),
    ("Daniel Melo", "PS", 18),
    ("Nelson Venegas", "PS", 21),
    ("Cristóbal Urruticoechea", "PREP", 6),
    ("Juan Irarrázaval", "PREP", 12),
    ("Christian Matheson", "PREP", 24),
    ("Mauricio Ojeda", "PREP", 2),
    ("Héctor Ulloa", "DC", 27),
    ("Miguel Mellado", "RN", 23),
    ("Alberto Undurraga", "DC", 10),
    ("Raúl Soto", "PPD", 15),
    ("Marco Sulantay", "UDI", 2),
    ("Sebastián Videla", "DC", 20),
    ("Flor Weisse", "RN", 22),
    ("Renzo Trisotti", "UDI", 1),
    ("Consuelo Veloso", "FA", 20),
    ("Hernán Palma", "IND", 21),
    ("Cristina Girardi", "PPD", 9),
    ("Marta González", "DC", 19),
    ("Luis Sánchez", "PREP", 8),
    ("Ignacio Urrutia", "PREP", 14),
    ("Pablo Prieto", "PREP", 22),
    ("Gastón Saavedra", "PS", 21),
    ("María José Hoffmann", "UDI", 6),
    ("Gustavo Sanhueza", "UDI", 23),
];

const INCONSISTENCIES: &[&str] = &[
    "Votó en contra de reforma de pensiones tras apoyarla públicamente",
    "Cambio de posición en tema tributario",
];

/// `(bulletin, title, topic, priority, citizen impact)`.
const BILLS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "17797-06",
        "Modifica ley sobre asociaciones y participación ciudadana",
        "Participación",
        "alto",
        "alto",
    ),
    (
        "16854-07",
        "Moderniza regulación del lobby y gestiones de intereses",
        "Transparencia",
        "alto",
        "alto",
    ),
    (
        "15987-04",
        "Protección de defensoras de naturaleza y derechos ambientales",
        "Derechos",
        "medio",
        "alto",
    ),
    (
        "17234-06",
        "Modifica ley de acceso a información pública",
        "Transparencia",
        "alto",
        "alto",
    ),
    (
        "16432-12",
        "Participación política de personas con discapacidad",
        "Electoral",
        "medio",
        "medio",
    ),
];

/// Seeded generator for every dashboard endpoint.
#[derive(Debug, Clone)]
pub struct FallbackSource {
    seed: u64,
    deputies: Vec<Value>,
}

impl Default for FallbackSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl FallbackSource {
    /// Generate the synthetic roster for `seed`.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let deputies = ROSTER
            .iter()
            .enumerate()
            .map(|(i, entry)| generate_deputy(&mut rng, i, entry))
            .collect();
        Self { seed, deputies }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Raw `diputados` payload.
    pub fn raw_deputies(&self) -> Value {
        Value::Array(self.deputies.clone())
    }

    /// Raw `estadisticas` payload, derived from the generated deputies.
    pub fn raw_stats(&self) -> Value {
        let levels: Vec<i64> = self.deputies.iter().map(alert_of).collect();
        let high = levels.iter().filter(|&&l| l >= 7).count();
        let medium = levels.iter().filter(|&&l| (4..7).contains(&l)).count();
        let attendance_sum: i64 = self
            .deputies
            .iter()
            .map(|d| d["asistencia"].as_i64().unwrap_or(0))
            .sum();
        let average = match self.deputies.len() {
            0 => 0,
            n => (attendance_sum as f64 / n as f64).round() as i64,
        };
        json!({
            "totalDiputados": self.deputies.len(),
            "alertasAltas": high,
            "alertasMedias": medium,
            "votacionesAnalizadas": VOTES_ANALYZED,
            "asistenciaPromedio": average,
        })
    }

    /// Raw `estadisticasPartido` payload: one row per party, largest first.
    pub fn raw_party_stats(&self) -> Value {
        // (code, name, count, alert sum), in first-appearance order.
        let mut rows: Vec<(&str, &str, u32, i64)> = Vec::new();
        for dep in &self.deputies {
            let code = dep["partido"].as_str().unwrap_or("IND");
            let level = alert_of(dep);
            match rows.iter_mut().find(|r| r.0 == code) {
                Some(row) => {
                    row.2 += 1;
                    row.3 += level;
                }
                None => rows.push((code, party_name(code), 1, level)),
            }
        }
        rows.sort_by(|a, b| b.2.cmp(&a.2));
        Value::Array(
            rows.into_iter()
                .map(|(code, name, count, sum)| {
                    let avg = (sum as f64 / count as f64 * 10.0).round() / 10.0;
                    json!({
                        "sigla": code,
                        "nombre": name,
                        "count": count,
                        "alertaPromedio": avg,
                    })
                })
                .collect(),
        )
    }

    /// Raw `alertas` payload: alert level 5 and above, highest first, capped.
    pub fn raw_alerts(&self) -> Value {
        let mut flagged: Vec<&Value> = self
            .deputies
            .iter()
            .filter(|d| alert_of(d) >= 5)
            .collect();
        flagged.sort_by(|a, b| alert_of(b).cmp(&alert_of(a)));
        Value::Array(flagged.into_iter().take(MAX_ALERTS).cloned().collect())
    }

    /// Raw `proyectosLey` payload.
    pub fn raw_bills(&self) -> Value {
        Value::Array(
            BILLS
                .iter()
                .map(|(bulletin, title, topic, priority, impact)| {
                    json!({
                        "boletin": bulletin,
                        "titulo": title,
                        "tema": topic,
                        "prioridad": priority,
                        "impactoCiudadania": impact,
                        "url": "#",
                    })
                })
                .collect(),
        )
    }

    /// Raw `proximasVotaciones` payload: the high-priority bills.
    pub fn raw_upcoming_bills(&self) -> Value {
        let Value::Array(all) = self.raw_bills() else {
            return Value::Array(Vec::new());
        };
        Value::Array(
            all.into_iter()
                .filter(|b| b["prioridad"] == "alto")
                .collect(),
        )
    }

    /// Raw `diputadoDetalle` payload, `null` when the id is unknown.
    pub fn raw_deputy(&self, id: &DeputyId) -> Value {
        let DeputyId::Num(wanted) = id else {
            return Value::Null;
        };
        self.deputies
            .iter()
            .find(|d| d["id"].as_i64() == Some(*wanted))
            .cloned()
            .unwrap_or(Value::Null)
    }
}

fn generate_deputy(rng: &mut StdRng, index: usize, entry: &(&str, &str, u8)) -> Value {
    let (name, party, district) = *entry;
    let n = index + 1;
    let alert: u8 = rng.gen_range(0..=10);
    let attendance: u8 = 70 + rng.gen_range(0..30);
    let total: u32 = 50 + rng.gen_range(0..50);
    let favor: u32 = 30 + rng.gen_range(0..40);
    let against: u32 = 10 + rng.gen_range(0..20);
    let abstain: u32 = rng.gen_range(0..10);

    let inconsistencies: &[&str] = if alert > 5 { INCONSISTENCIES } else { &[] };

    let pensions = if rng.gen_bool(0.5) { "favor" } else { "contra" };
    let budget = if rng.gen_bool(0.7) { "favor" } else { "abstencion" };
    let tax = if rng.gen_bool(0.5) { "contra" } else { "favor" };
    let security = if rng.gen_bool(0.6) { "favor" } else { "contra" };

    json!({
        "id": n,
        "nombre": name,
        "partido": party,
        "partidoNombre": party_name(party),
        "distrito": format!("Distrito N°{district}"),
        "nivelAlerta": alert,
        "asistencia": attendance,
        "votacionesTotal": total,
        "aFavor": favor,
        "enContra": against,
        "abstencion": abstain,
        "twitter": format!("@diputado{n}"),
        "instagram": format!("diputado{n}"),
        "email": format!("diputado{n}@congreso.cl"),
        "inconsistencias": inconsistencies,
        "votaciones": [
            {"titulo": "Reforma de Pensiones", "voto": pensions, "fecha": "2026-01-15"},
            {"titulo": "Ley 40 Horas", "voto": "favor", "fecha": "2026-01-10"},
            {"titulo": "Presupuesto 2026", "voto": budget, "fecha": "2025-12-20"},
            {"titulo": "Reforma Tributaria", "voto": tax, "fecha": "2025-12-01"},
            {"titulo": "Ley Naín-Retamal", "voto": security, "fecha": "2025-11-15"},
        ],
    })
}

fn party_name(code: &str) -> &'static str {
    PARTIES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or("Independiente")
}

fn alert_of(dep: &Value) -> i64 {
    dep["nivelAlerta"].as_i64().unwrap_or(0)
}
