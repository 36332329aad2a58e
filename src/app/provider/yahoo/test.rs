#![cfg(test)]

use super::*;

const AAPL_CHART: &str = r#"{
    "chart": {
        "result": [
            {
                "meta": {
                    "currency": "USD",
                    "symbol": "AAPL",
                    "exchangeName": "NMS",
                    "regularMarketPrice": 189.84,
                    "chartPreviousClose": 191.24
                },
                "timestamp": [1709301600],
                "indicators": {"quote": [{"close": [189.84]}]}
            }
        ],
        "error": null
    }
}"#;

fn create_yahoo_provider() -> YahooFinanceProvider {
    YahooFinanceProvider::new(
        String::from("https://query1.finance.yahoo.com/v8/finance/chart/"),
        String::from("https://query1.finance.yahoo.com/v1/finance/search"),
        String::from("test-agent"),
        Duration::from_secs(1),
    )
}

#[test]
fn test_chart_price_is_read_from_meta() {
    let chart = serde_json::from_str::<ChartEnvelope>(AAPL_CHART).unwrap();

    assert_eq!(chart.regular_market_price(), Some(189.84));
}

#[test]
fn test_chart_without_result_has_no_price() {
    let chart = serde_json::from_str::<ChartEnvelope>(
        r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}}"#
    ).unwrap();
    assert_eq!(chart.regular_market_price(), None);

    let chart = serde_json::from_str::<ChartEnvelope>(r#"{"chart": {"result": []}}"#).unwrap();
    assert_eq!(chart.regular_market_price(), None);
}

#[test]
fn test_search_picks_first_symbol() {
    let search = serde_json::from_str::<SearchResponse>(
        r#"{"count": 2, "quotes": [{"exchange": "NMS", "symbol": "AAPL"}, {"symbol": "APLE"}], "news": []}"#
    ).unwrap();

    assert_eq!(search.first_symbol(), Some(String::from("AAPL")));
}

#[test]
fn test_search_without_quotes_has_no_symbol() {
    let search = serde_json::from_str::<SearchResponse>(r#"{"count": 0, "news": []}"#).unwrap();

    assert_eq!(search.first_symbol(), None);
}

#[test]
fn test_chart_url_escapes_symbol() {
    let provider = create_yahoo_provider();

    assert_eq!(
        provider.build_chart_url("BRK B").unwrap().as_str(),
        "https://query1.finance.yahoo.com/v8/finance/chart/BRK%20B"
    );
    assert_eq!(
        provider.build_chart_url("A/B").unwrap().as_str(),
        "https://query1.finance.yahoo.com/v8/finance/chart/A%2FB"
    );
}

#[test]
fn test_search_url_contains_company_name() {
    let provider = create_yahoo_provider();

    assert_eq!(
        provider.build_search_url("Apple Inc").unwrap().as_str(),
        "https://query1.finance.yahoo.com/v1/finance/search?q=Apple+Inc&quotesCount=1&newsCount=0"
    );
}
