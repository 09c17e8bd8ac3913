use serde::{Deserialize, Serialize};

/// Success envelope: every JSON body the API returns is `{ "data": T }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}
