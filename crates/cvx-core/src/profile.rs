//! Structured view of an extracted CV payload.
//!
//! The NER stage emits Spanish section keys whose spelling varies between
//! model runs (`educación` / `educacion`, `idiomas` / `idomas`, dashes
//! instead of underscores). [`build_view`] resolves those aliases into a
//! [`CvProfile`]; payloads with no recognizable section fall back to a
//! generic key/value listing, and plain strings (raw OCR output) are shown
//! as text.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::normalize::{display_text, MISSING};

const PERSONAL_KEYS: &[&str] = &["datos_personales", "datos-personales", "personales"];
const EXPERIENCE_KEYS: &[&str] = &["experiencia_laboral", "experiencia", "experiencia-laboral"];
const EDUCATION_KEYS: &[&str] = &["educación", "educacion"];
const SKILL_KEYS: &[&str] = &["habilidades_técnicas", "habilidades", "habilidades-tecnicas"];
const LANGUAGE_KEYS: &[&str] = &["idiomas", "idomas"];
const CERTIFICATION_KEYS: &[&str] = &["certificaciones_y_cursos", "certificaciones", "cursos"];
const OTHER_KEYS: &[&str] = &["otros", "extra", "adicional"];

/// How an extracted payload should be presented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum ExtractedView<'a> {
    /// Nothing to show.
    Empty,
    /// Unstructured text, typically raw OCR output.
    Text(&'a str),
    Profile(CvProfile),
    /// No known section: humanized key/value pairs.
    Generic(Vec<(String, String)>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CvProfile {
    pub personal: Option<PersonalData>,
    pub experience: Vec<HistoryEntry>,
    pub education: Vec<HistoryEntry>,
    pub skills: Vec<String>,
    pub languages: Vec<LanguageSkill>,
    /// `Some` whenever the payload carries a certification list, even an empty one.
    pub certifications: Option<Vec<String>>,
    pub other: Option<OtherInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonalData {
    pub name: Option<String>,
    pub emails: Vec<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl PersonalData {
    pub fn is_blank(&self) -> bool {
        self.name.is_none() && self.emails.is_empty() && self.phone.is_none() && self.address.is_none()
    }
}

/// A row of work experience (company, role) or education (institution, degree).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub organization: String,
    pub title: String,
    pub period: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageSkill {
    pub language: String,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum OtherInfo {
    List(Vec<String>),
    Fields(Vec<(String, String)>),
    Text(String),
}

/// JavaScript-style truthiness, which the backend's optional fields follow.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// First non-null value among `keys` of an object.
fn pick<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| map.get(*k))
        .find(|v| !v.is_null())
}

fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    value.as_object().and_then(|m| pick(m, keys))
}

fn field_or_missing(value: &Value, keys: &[&str]) -> String {
    field(value, keys)
        .map(display_text)
        .unwrap_or_else(|| MISSING.to_string())
}

fn truthy_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(display_text)
}

fn non_empty_array(value: Option<&Value>) -> Option<&Vec<Value>> {
    value.and_then(Value::as_array).filter(|a| !a.is_empty())
}

/// Text form used for list items: strings verbatim, everything else as JSON.
fn item_text(value: &Value) -> String {
    display_text(value)
}

/// `"inicio → fin"`, whichever side is present, or the missing marker.
pub fn period_text(period: Option<&Value>) -> String {
    let Some(p) = period.filter(|p| is_truthy(p)) else {
        return MISSING.to_string();
    };
    let start = truthy_text(field(p, &["fecha_inicio"]));
    let end = truthy_text(field(p, &["fecha_fin"]));
    match (start, end) {
        (Some(a), Some(b)) => format!("{} → {}", a, b),
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => MISSING.to_string(),
    }
}

/// `"fecha_inicio"` -> `"Fecha Inicio"`.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

fn generic_pairs(map: &Map<String, Value>) -> Vec<(String, String)> {
    map.iter()
        .map(|(k, v)| (humanize_key(k), display_text(v)))
        .collect()
}

fn personal_data(value: &Value) -> PersonalData {
    let emails = match field(value, &["correo_electronico"]) {
        Some(Value::Array(items)) => items.iter().filter(|v| is_truthy(v)).map(item_text).collect(),
        Some(v) if is_truthy(v) => vec![item_text(v)],
        _ => Vec::new(),
    };
    PersonalData {
        name: truthy_text(field(value, &["name", "nombre"])),
        emails,
        phone: truthy_text(field(value, &["telefono", "tel"])),
        address: truthy_text(field(value, &["direccion"])),
    }
}

fn history(items: &[Value], org_keys: &[&str], title_keys: &[&str]) -> Vec<HistoryEntry> {
    items
        .iter()
        .map(|it| HistoryEntry {
            organization: field_or_missing(it, org_keys),
            title: field_or_missing(it, title_keys),
            period: period_text(field(it, &["periodo"])),
        })
        .collect()
}

fn other_info(value: &Value) -> OtherInfo {
    match value {
        Value::Array(items) => OtherInfo::List(items.iter().map(item_text).collect()),
        Value::Object(map) => OtherInfo::Fields(generic_pairs(map)),
        other => OtherInfo::Text(display_text(other)),
    }
}

/// Decide how to present an extracted payload.
pub fn build_view(payload: Option<&Value>) -> ExtractedView<'_> {
    let map = match payload {
        Some(Value::String(text)) => return ExtractedView::Text(text),
        Some(Value::Object(map)) => map,
        Some(Value::Array(items)) => {
            let pairs = items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), display_text(v)))
                .collect();
            return ExtractedView::Generic(pairs);
        }
        _ => return ExtractedView::Empty,
    };

    let personal = pick(map, PERSONAL_KEYS);
    let experience = pick(map, EXPERIENCE_KEYS);
    let education = pick(map, EDUCATION_KEYS);
    let skills = pick(map, SKILL_KEYS);
    let languages = pick(map, LANGUAGE_KEYS);
    let certifications = pick(map, CERTIFICATION_KEYS);
    let other = pick(map, OTHER_KEYS);

    let any_section = [personal, experience, education, skills, languages, certifications, other]
        .into_iter()
        .flatten()
        .any(is_truthy);
    if !any_section {
        return ExtractedView::Generic(generic_pairs(map));
    }

    ExtractedView::Profile(CvProfile {
        personal: personal.filter(|v| is_truthy(v)).map(personal_data),
        experience: non_empty_array(experience)
            .map(|items| history(items, &["empresa"], &["cargo"]))
            .unwrap_or_default(),
        education: non_empty_array(education)
            .map(|items| history(items, &["institución", "institucion"], &["título", "titulo"]))
            .unwrap_or_default(),
        skills: non_empty_array(skills)
            .map(|items| items.iter().map(item_text).collect())
            .unwrap_or_default(),
        languages: non_empty_array(languages)
            .map(|items| {
                items
                    .iter()
                    .map(|it| LanguageSkill {
                        language: field_or_missing(it, &["idioma"]),
                        level: field_or_missing(it, &["nivel"]),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        certifications: certifications
            .and_then(Value::as_array)
            .map(|items| items.iter().map(item_text).collect()),
        other: other.filter(|v| is_truthy(v)).map(other_info),
    })
}
