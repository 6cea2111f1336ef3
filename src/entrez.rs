use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::Accession;
use crate::error::AccfetchError;

pub trait EntrezClient {
    fn fetch_fasta(&self, accession: &Accession) -> Result<String, AccfetchError>;
}

#[derive(Clone)]
pub struct EntrezHttpClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl EntrezHttpClient {
    pub fn new() -> Result<Self, AccfetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("accfetch/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| AccfetchError::EntrezHttp(err.to_string()))?,
        );

        // Long records can take minutes; no deadline on a fetch.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(None)
            .build()
            .map_err(|err| AccfetchError::EntrezHttp(err.to_string()))?;

        let api_key = std::env::var("NCBI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            client,
            base_url: "https://eutils.ncbi.nlm.nih.gov/entrez/eutils".to_string(),
            api_key,
        })
    }
}

impl EntrezClient for EntrezHttpClient {
    fn fetch_fasta(&self, accession: &Accession) -> Result<String, AccfetchError> {
        let url = format!("{}/efetch.fcgi", self.base_url);
        let mut request = self.client.get(&url).query(&[
            ("db", "nucleotide"),
            ("id", accession.as_str()),
            ("rettype", "fasta"),
            ("retmode", "text"),
        ]);
        if let Some(api_key) = &self.api_key {
            request = request.query(&[("api_key", api_key.as_str())]);
        }

        tracing::debug!(accession = accession.as_str(), "entrez efetch request");
        let response = request
            .send()
            .map_err(|err| AccfetchError::EntrezHttp(err.to_string()))?;

        // Entrez reports per-accession problems in the body; the text is
        // passed through as-is and header cleaning is the only processing.
        response
            .text()
            .map_err(|err| AccfetchError::EntrezHttp(err.to_string()))
    }
}
