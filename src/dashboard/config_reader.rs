use crate::dashboard::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "raffleName")]
    pub raffle_name: Option<String>,
    pub prize: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    // Column overrides, for Excel inputs. They start at 1 and may be written as letters.
    #[serde(rename = "nameColumnIndex")]
    pub name_column_index: Option<JSValue>,
    #[serde(rename = "entriesColumnIndex")]
    pub entries_column_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "departmentColumnIndex")]
    pub department_column_index: Option<JSValue>,
}

impl RosterSource {
    pub fn new(provider: &str, file_path: &str) -> RosterSource {
        RosterSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            excel_worksheet_name: None,
            name_column_index: None,
            entries_column_index: None,
            id_column_index: None,
            department_column_index: None,
        }
    }

    pub fn name_column_index_int(&self) -> CliResult<Option<usize>> {
        read_js_int(&self.name_column_index)
    }

    pub fn entries_column_index_int(&self) -> CliResult<Option<usize>> {
        read_js_int(&self.entries_column_index)
    }

    pub fn id_column_index_int(&self) -> CliResult<Option<usize>> {
        read_js_int(&self.id_column_index)
    }

    pub fn department_column_index_int(&self) -> CliResult<Option<usize>> {
        read_js_int(&self.department_column_index)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaffleRules {
    #[serde(rename = "revealDelayMs")]
    pub reveal_delay_ms: Option<u64>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "topPerformers")]
    pub top_performers: Option<usize>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RaffleConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "rosterSources", default)]
    pub roster_sources: Vec<RosterSource>,
    #[serde(default)]
    pub rules: RaffleRules,
}

pub fn read_config(path: &str) -> CliResult<RaffleConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RaffleConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> CliResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

// Column indexes start at 1, as in spreadsheets. Letters are accepted too ("A", "AB").
fn read_js_int(x: &Option<JSValue>) -> CliResult<Option<usize>> {
    let idx = match x {
        None | Some(JSValue::Null) => return Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {})?,
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_lowercase()
                .chars()
                .try_fold(0usize, |acc, c| {
                    acc.checked_mul(26)?
                        .checked_add(c as usize - 'a' as usize + 1)
                })
                .context(ParsingJsonNumberSnafu {})?
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {})?,
        _ => None.context(ParsingJsonNumberSnafu {})?,
    };
    if idx == 0 {
        return None.context(ParsingJsonNumberSnafu {});
    }
    Ok(Some(idx - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn column_indexes() {
        assert_eq!(read_js_int(&None).unwrap(), None);
        assert_eq!(read_js_int(&Some(json!(1))).unwrap(), Some(0));
        assert_eq!(read_js_int(&Some(json!("3"))).unwrap(), Some(2));
        assert_eq!(read_js_int(&Some(json!("A"))).unwrap(), Some(0));
        assert_eq!(read_js_int(&Some(json!("c"))).unwrap(), Some(2));
        assert_eq!(read_js_int(&Some(json!("AB"))).unwrap(), Some(27));
        assert!(read_js_int(&Some(json!(0))).is_err());
        assert!(read_js_int(&Some(json!("-2"))).is_err());
        assert!(read_js_int(&Some(json!(true))).is_err());
        assert_eq!(read_js_int(&Some(json!("zz"))).unwrap(), Some(701));
        assert!(read_js_int(&Some(json!("ZZZZZZZZZZZZZZ"))).is_err());
    }

    #[test]
    fn parse_config() {
        let js = r#"{
            "outputSettings": {"raffleName": "Q3 raffle", "prize": "Gift card"},
            "rosterSources": [
                {"provider": "excel", "filePath": "roster.xlsx", "entriesColumnIndex": "D"}
            ],
            "rules": {"revealDelayMs": 1000, "randomSeed": "2024-Q3"}
        }"#;
        let config: RaffleConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.raffle_name, Some("Q3 raffle".to_string()));
        assert_eq!(config.output_settings.output_directory, None);
        assert_eq!(config.roster_sources.len(), 1);
        let src = &config.roster_sources[0];
        assert_eq!(src.provider, "excel");
        assert_eq!(src.entries_column_index_int().unwrap(), Some(3));
        assert_eq!(src.name_column_index_int().unwrap(), None);
        assert_eq!(config.rules.reveal_delay_ms, Some(1000));
        assert_eq!(config.rules.top_performers, None);
    }

    #[test]
    fn minimal_config() {
        let config: RaffleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RaffleConfig::default());
    }
}
