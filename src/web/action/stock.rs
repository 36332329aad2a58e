use actix_web::HttpRequest;
use actix_web::FutureResponse;
use actix_web::HttpResponse;
use actix_web::Error;
use futures::Future;
use futures::future::err as fut_err;

use crate::web::StockState;
use crate::web::action::{ApiError, query_param};

#[derive(Debug, Serialize, Deserialize)]
pub struct StockDetailsResponse {
    pub message: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SymbolResponse {
    pub message: String,
    pub symbol: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PriceResponse {
    pub message: String,
    pub price: f64,
}

fn rejected(error: ApiError) -> FutureResponse<HttpResponse> {
    Box::new(fut_err(Error::from(error)))
}

pub fn details(req: &HttpRequest<StockState>) -> FutureResponse<HttpResponse> {
    let symbol = match query_param(req, "symbol") {
        Some(symbol) => symbol,
        None => return rejected(ApiError::Validation { error: "Stock symbol is required" }),
    };

    Box::new(
        req.state()
            .quotes
            .chart(&symbol)
            .map(|data| HttpResponse::Ok().json(StockDetailsResponse {
                message: String::from("Stock details fetched successfully"),
                data,
            }))
            .map_err(move |e| {
                error!("Error fetching stock details for {}: {}", symbol, e);
                Error::from(ApiError::Upstream { error: "Failed to fetch stock details", message: None })
            })
    )
}

pub fn symbol(req: &HttpRequest<StockState>) -> FutureResponse<HttpResponse> {
    let company_name = match query_param(req, "companyName") {
        Some(company_name) => company_name,
        None => return rejected(ApiError::Validation { error: "Company name is required" }),
    };

    Box::new(
        req.state()
            .quotes
            .lookup_symbol(&company_name)
            .map_err(move |e| {
                error!("Error fetching stock symbol for {}: {}", company_name, e);
                ApiError::Upstream { error: "Failed to fetch stock symbol", message: None }
            })
            .and_then(|symbol| match symbol {
                Some(symbol) => Ok(HttpResponse::Ok().json(SymbolResponse {
                    message: String::from("Symbol fetched successfully"),
                    symbol,
                })),
                None => Err(ApiError::NotFound { error: "No symbol found for company" }),
            })
            .map_err(Error::from)
    )
}

pub fn price(req: &HttpRequest<StockState>) -> FutureResponse<HttpResponse> {
    let symbol = match query_param(req, "symbol") {
        Some(symbol) => symbol,
        None => return rejected(ApiError::Validation { error: "Stock symbol is required" }),
    };

    Box::new(
        req.state()
            .quotes
            .price(&symbol)
            .map_err(move |e| {
                error!("Error fetching stock price for {}: {}", symbol, e);
                ApiError::Upstream { error: "Failed to fetch stock price", message: None }
            })
            .and_then(|price| match price {
                Some(price) => Ok(HttpResponse::Ok().json(PriceResponse {
                    message: String::from("Stock price fetched successfully"),
                    price,
                })),
                None => Err(ApiError::NotFound { error: "No price data found for symbol" }),
            })
            .map_err(Error::from)
    )
}
