mod url;

pub use url::{CreateUrlRequest, ListQuery, RetrieveQuery, UrlMapping, UrlRecordResponse};
