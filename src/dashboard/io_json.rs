// Readers for the employee lists produced by the dashboard API.

use serde::Deserialize;
use serde_json::Value as JSValue;

use crate::dashboard::{io_common::make_default_id, *};

#[derive(Debug, Clone, Deserialize)]
struct JsonEmployee {
    #[serde(default)]
    id: Option<JSValue>,
    name: String,
    #[serde(default)]
    total_entries: Option<u64>,
    // Older exports only carry `entries`.
    #[serde(default)]
    entries: Option<u64>,
    #[serde(default)]
    department: Option<String>,
}

pub fn read_json_roster(path: String) -> BCliResult<Vec<EmployeeRecord>> {
    let contents = fs::read_to_string(&path).context(OpeningJsonSnafu { path: path.clone() })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    parse_json_roster(&path, &js)
}

/// Accepts three shapes:
/// - the response of the employee list: `{"success": true, "employees": [...]}`
/// - the bare array of employees
/// - a map from the name of the employee to `{"entries": n}`
pub fn parse_json_roster(path: &str, js: &JSValue) -> BCliResult<Vec<EmployeeRecord>> {
    let default_id = make_default_id(path);
    let employees: Vec<JsonEmployee> = match js {
        JSValue::Object(obj) if obj.contains_key("employees") => {
            if obj.get("success") == Some(&JSValue::Bool(false)) {
                warn!("parse_json_roster: {:?} reports an unsuccessful response", path);
            }
            serde_json::from_value(obj["employees"].clone()).context(ParsingJsonSnafu {})?
        }
        JSValue::Array(_) => serde_json::from_value(js.clone()).context(ParsingJsonSnafu {})?,
        JSValue::Object(obj) => {
            let mut res: Vec<JsonEmployee> = Vec::new();
            for (name, data) in obj.iter() {
                let entries = data
                    .get("entries")
                    .or_else(|| data.get("total_entries"))
                    .and_then(|v| v.as_u64());
                res.push(JsonEmployee {
                    id: None,
                    name: name.clone(),
                    total_entries: entries,
                    entries: None,
                    department: None,
                });
            }
            res
        }
        _ => {
            return Err(Box::new(RaffleCliError::JsonRosterShape {
                path: path.to_string(),
            }))
        }
    };

    let mut res: Vec<EmployeeRecord> = Vec::new();
    for (idx, e) in employees.into_iter().enumerate() {
        let id = match e.id {
            Some(JSValue::String(s)) => s,
            Some(JSValue::Number(n)) => n.to_string(),
            _ => default_id(idx + 1),
        };
        let total_entries = e.total_entries.or(e.entries).unwrap_or(0);
        debug!(
            "parse_json_roster: {:?} {:?} -> {} entries",
            id, e.name, total_entries
        );
        res.push(EmployeeRecord {
            id,
            name: e.name.trim().to_string(),
            total_entries,
            department: e.department.filter(|d| !d.is_empty()),
        });
    }
    info!("Read {} employees from {:?}", res.len(), path);
    Ok(res)
}
