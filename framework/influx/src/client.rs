use crate::database::{Database, DatabaseError};
use crate::encode::into_write_query;
use crate::response::database_names;
use influxdb::{Client, ReadQuery};
use speedtest_model::MetricPoint;
use tokio::runtime::Runtime;
use url::Url;

/// Connection parameters for an InfluxDB 1.x server.
///
/// The username and password are sent as the `u` and `p` query parameters of each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Host name or URL of the server. A bare host name is reached over plain HTTP.
    pub address: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl ConnectionOptions {
    /// The base URL the client talks to.
    ///
    /// An address with a scheme keeps its own port if it names one. A port equal to the
    /// scheme's default (`http://host:80`) counts as no port, so `port` is used instead.
    pub fn url(&self) -> String {
        if !self.address.contains("://") {
            return format!("http://{}:{}", self.address, self.port);
        }

        match Url::parse(&self.address) {
            Ok(mut url) => {
                if url.port().is_none() && url.set_port(Some(self.port)).is_err() {
                    log::warn!("Cannot set port {} on {}", self.port, self.address);
                }
                url.as_str().trim_end_matches('/').to_string()
            }
            // Left for the client to reject on first use.
            Err(_) => self.address.trim_end_matches('/').to_string(),
        }
    }
}

/// [Database] backed by the InfluxDB HTTP API.
///
/// The `influxdb` client is async, so every call is driven to completion on a private
/// current-thread runtime. Callers see plain blocking calls.
pub struct InfluxDatabase {
    runtime: Runtime,
    options: ConnectionOptions,
    /// Used for server level statements that don't need a database.
    server: Client,
    /// Set once a database has been selected with [Database::use_database].
    selected: Option<Client>,
}

impl InfluxDatabase {
    pub fn connect(options: ConnectionOptions) -> Result<Self, DatabaseError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let server = Self::client(&options, "");

        Ok(Self {
            runtime,
            options,
            server,
            selected: None,
        })
    }

    /// Name of the database writes currently go to.
    pub fn selected_database(&self) -> Option<&str> {
        self.selected.as_ref().map(|c| c.database_name())
    }

    fn client(options: &ConnectionOptions, database: &str) -> Client {
        Client::new(options.url(), database).with_auth(&options.username, &options.password)
    }
}

impl Database for InfluxDatabase {
    fn list_databases(&mut self) -> Result<Vec<String>, DatabaseError> {
        let query = ReadQuery::new("SHOW DATABASES");
        log::debug!("Querying: {:?}", query);

        let response = self.runtime.block_on(self.server.json_query(query))?;
        database_names(&response.results)
    }

    fn create_database(&mut self, name: &str) -> Result<(), DatabaseError> {
        let query = ReadQuery::new(create_database_statement(name));
        log::debug!("Querying: {:?}", query);

        self.runtime.block_on(self.server.query(query))?;
        Ok(())
    }

    fn use_database(&mut self, name: &str) -> Result<(), DatabaseError> {
        log::debug!("Switching to database {name}");
        self.selected = Some(Self::client(&self.options, name));
        Ok(())
    }

    fn write_point(&mut self, point: &MetricPoint) -> Result<(), DatabaseError> {
        let client = self.selected.as_ref().ok_or(DatabaseError::NoDatabase)?;
        let query = into_write_query(point)?;

        self.runtime.block_on(client.query(query))?;
        log::trace!("Wrote point to {}", client.database_name());
        Ok(())
    }
}

fn create_database_statement(name: &str) -> String {
    format!(
        r#"CREATE DATABASE "{}""#,
        name.replace('\\', "\\\\").replace('"', "\\\"")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(address: &str) -> ConnectionOptions {
        ConnectionOptions {
            address: address.to_string(),
            port: 8086,
            username: "db_username".to_string(),
            password: "db_password".to_string(),
        }
    }

    #[test]
    fn url_from_bare_host() {
        assert_eq!(options("influx.lan").url(), "http://influx.lan:8086");
    }

    #[test]
    fn url_keeps_scheme() {
        assert_eq!(
            options("https://influx.example.com/").url(),
            "https://influx.example.com:8086"
        );
    }

    #[test]
    fn url_keeps_explicit_port() {
        assert_eq!(options("http://influx:8087").url(), "http://influx:8087");
        assert_eq!(
            options("https://influx.example.com:9999/").url(),
            "https://influx.example.com:9999"
        );
    }

    #[test]
    fn url_keeps_path_prefix() {
        assert_eq!(
            options("https://proxy.example.com/influx/").url(),
            "https://proxy.example.com:8086/influx"
        );
    }

    #[test]
    fn create_statement_quotes_name() {
        assert_eq!(
            create_database_statement("speedtest_db"),
            r#"CREATE DATABASE "speedtest_db""#
        );
        assert_eq!(
            create_database_statement(r#"odd"name"#),
            r#"CREATE DATABASE "odd\"name""#
        );
    }

    #[test]
    fn nothing_selected_until_use_database() {
        let mut database = InfluxDatabase::connect(options("localhost")).unwrap();
        assert_eq!(database.selected_database(), None);

        database.use_database("speedtest_db").unwrap();
        assert_eq!(database.selected_database(), Some("speedtest_db"));
    }

    #[test]
    fn write_without_database_fails() {
        let mut database = InfluxDatabase::connect(options("localhost")).unwrap();
        let point = speedtest_model::decode(
            br#"{
                "timestamp": "2024-03-01T10:00:00Z",
                "ping": { "jitter": 0.5, "latency": 9.0 },
                "download": { "bandwidth": 1250000, "bytes": 1, "elapsed": 1 },
                "upload": { "bandwidth": 1250000, "bytes": 1, "elapsed": 1 },
                "isp": "Example ISP",
                "interface": { "name": "eth0" },
                "server": {
                    "id": 1, "name": "a", "host": "b", "ip": "c", "location": "d", "country": "e"
                }
            }"#,
        )
        .unwrap();

        assert!(matches!(
            database.write_point(&point),
            Err(DatabaseError::NoDatabase)
        ));
    }
}
