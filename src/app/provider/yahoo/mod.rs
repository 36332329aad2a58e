use futures::Future;
use actix_web::client;
use futures::future::err as fut_err;
use actix_web::client::ClientRequest;
use std::time::Duration;
use url::Url;
use url::percent_encoding::{utf8_percent_encode, PATH_SEGMENT_ENCODE_SET};

use crate::app::provider::{QuoteSource, ProviderError};

use super::utils;

mod test;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

impl ChartEnvelope {
    fn regular_market_price(&self) -> Option<f64> {
        self.chart
            .result
            .as_ref()
            .and_then(|results| results.first())
            .and_then(|result| result.meta.regular_market_price)
    }
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchQuote>,
}

impl SearchResponse {
    fn first_symbol(self) -> Option<String> {
        self.quotes.into_iter().filter_map(|q| q.symbol).next()
    }
}

#[derive(Debug, Deserialize)]
struct SearchQuote {
    symbol: Option<String>,
}

pub struct YahooFinanceProvider {
    chart_uri: String,
    search_uri: String,
    user_agent: String,
    timeout: Duration,
}

impl YahooFinanceProvider {
    const NAME: &'static str = "Yahoo Finance";

    pub fn new(chart_uri: String, search_uri: String, user_agent: String, timeout: Duration) -> Self {
        YahooFinanceProvider {
            chart_uri,
            search_uri,
            user_agent,
            timeout,
        }
    }

    fn build_chart_url(&self, symbol: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}",
            self.chart_uri.trim_end_matches('/'),
            utf8_percent_encode(symbol, PATH_SEGMENT_ENCODE_SET)
        ))
    }

    fn build_search_url(&self, company_name: &str) -> Result<Url, url::ParseError> {
        Url::parse_with_params(&self.search_uri, &[
            ("q", company_name),
            ("quotesCount", "1"),
            ("newsCount", "0"),
        ])
    }

    fn build_request(&self, url: Result<Url, url::ParseError>) -> Result<ClientRequest, ProviderError> {
        let url = url.map_err(|e| Self::invalid_request(e.to_string()))?;

        client::get(url.as_str())
            .header("User-Agent", self.user_agent.clone())
            .header("Accept", "application/json")
            .finish()
            .map_err(|e| Self::invalid_request(e.to_string()))
    }

    fn invalid_request(reason: String) -> ProviderError {
        ProviderError::InvalidRequest { reason, provider_name: Self::NAME.to_owned() }
    }
}

impl QuoteSource for YahooFinanceProvider {
    fn chart(&self, symbol: &str) -> Box<super::ChartResponse> {
        let request = match self.build_request(self.build_chart_url(symbol)) {
            Ok(req) => req,
            Err(e) => return Box::new(fut_err(e)),
        };

        Box::new(
            utils::fetch_json::<serde_json::Value>(request, self.timeout)
                .map_err(|e| {
                    error!("Error fetching stock details: {}", e);
                    ProviderError::from_request(e, Self::NAME)
                })
        )
    }

    fn lookup_symbol(&self, company_name: &str) -> Box<super::SymbolOption> {
        let request = match self.build_request(self.build_search_url(company_name)) {
            Ok(req) => req,
            Err(e) => return Box::new(fut_err(e)),
        };

        let company_name = company_name.to_owned();

        Box::new(
            utils::fetch_json::<SearchResponse>(request, self.timeout)
                .map(move |res| {
                    let symbol = res.first_symbol();
                    info!("Symbol lookup for {} from Yahoo {:?}", company_name, symbol);
                    symbol
                })
                .map_err(|e| {
                    error!("Error fetching stock symbol: {}", e);
                    ProviderError::from_request(e, Self::NAME)
                })
        )
    }

    fn price(&self, symbol: &str) -> Box<super::PriceOption> {
        let request = match self.build_request(self.build_chart_url(symbol)) {
            Ok(req) => req,
            Err(e) => return Box::new(fut_err(e)),
        };

        Box::new(
            utils::fetch_json::<ChartEnvelope>(request, self.timeout)
                .then(|chart| match chart {
                    Ok(chart) => Ok(chart.regular_market_price()),
                    Err(ref e) if e.is_not_found() => Ok(None),
                    Err(e) => {
                        error!("Error fetching stock price: {}", e);
                        Err(ProviderError::from_request(e, Self::NAME))
                    }
                })
        )
    }
}
