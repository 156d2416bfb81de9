mod clients;
mod density;
mod era5;
mod error;
mod export;
mod retrieval;
mod types;
mod utils;

pub use error::Era5DensityError;
pub use era5::*;

pub use clients::reanalysis_client::*;

pub use density::calculator::*;
pub use density::error::{ComputeError, MeasurementField};

pub use export::*;

pub use retrieval::credentials::CdsCredentials;
pub use retrieval::error::RetrievalError;
pub use retrieval::request::{DataRequest, DEFAULT_DATASET};

pub use types::area::*;
pub use types::observation::*;
pub use types::reanalysis_frame::*;
pub use types::variable::Variable;
