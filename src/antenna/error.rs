use thiserror::Error;

#[derive(Debug, Error)]
pub enum AntennaError {
    #[error("cannot open rotor port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },
}
