use crate::DatabaseError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
struct QueryResult {
    #[serde(default)]
    series: Vec<QuerySeries>,
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct QuerySeries {
    name: String,
    #[serde(default)]
    columns: Vec<String>,
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Extract the database names from the results of a `SHOW DATABASES` query.
///
/// A server with no databases answers with a result that has no series at all.
pub(crate) fn database_names(results: &[Value]) -> Result<Vec<String>, DatabaseError> {
    let result = results
        .first()
        .ok_or_else(|| DatabaseError::Response("no results in response".to_string()))?;
    let result: QueryResult = serde_json::from_value(result.clone())
        .map_err(|e| DatabaseError::Response(e.to_string()))?;

    if let Some(error) = result.error {
        return Err(DatabaseError::Server(error));
    }

    let Some(series) = result.series.into_iter().find(|s| s.name == "databases") else {
        return Ok(Vec::new());
    };

    let name_column = series
        .columns
        .iter()
        .position(|c| c == "name")
        .unwrap_or(0);

    series
        .values
        .into_iter()
        .map(|row| match row.get(name_column) {
            Some(Value::String(name)) => Ok(name.clone()),
            other => Err(DatabaseError::Response(format!(
                "expected a database name, got {other:?}"
            ))),
        })
        .collect()
}
