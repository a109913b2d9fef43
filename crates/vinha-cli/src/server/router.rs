use serde::Deserialize;
use serde_json::{json, Value};
use tiny_http::Method;
use tracing::{debug, error};

use vinha_core::error::VinhaError;
use vinha_core::extraction::ReportSource;
use vinha_core::model::{ReportKind, ReportQuery};

use super::apispec;
use super::auth::{AuthError, Credentials, TokenSigner};

pub const WELCOME: &str = "Welcome to the Brazil Wine Data API!";

/// A request reduced to what the routes look at.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Request target, possibly with a query string.
    pub url: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        ApiResponse { status: 200, body }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    fn auth(status: u16, err: &AuthError) -> Self {
        ApiResponse {
            status,
            body: json!({ "msg": err.to_string() }),
        }
    }
}

#[derive(Deserialize)]
struct LoginRequest {
    username: String,
    password: String,
}

/// Routes, access control and error mapping for the HTTP API.
///
/// Every data route requires a bearer token; `/`, `/login` and
/// `/apispec.json` are open.
pub struct Api {
    source: Box<dyn ReportSource>,
    signer: TokenSigner,
    users: Credentials,
}

impl Api {
    pub fn new(source: Box<dyn ReportSource>, signer: TokenSigner, users: Credentials) -> Self {
        Api {
            source,
            signer,
            users,
        }
    }

    pub fn handle(&self, req: &ApiRequest) -> ApiResponse {
        let path = req.url.split('?').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match (&req.method, segments.as_slice()) {
            (Method::Get, []) => ApiResponse::ok(json!({ "message": WELCOME })),
            (Method::Get, ["apispec.json"]) => ApiResponse::ok(apispec::document()),
            (Method::Post, ["login"]) => self.login(&req.body),
            (Method::Get, ["production", year]) => {
                self.report(req, ReportKind::Production, year, None)
            }
            (Method::Get, ["processing", year, category]) => {
                self.report(req, ReportKind::Processing, year, Some(*category))
            }
            (Method::Get, ["commercialization", year]) => {
                self.report(req, ReportKind::Commercialization, year, None)
            }
            (Method::Get, ["import", year, category]) => {
                self.report(req, ReportKind::Import, year, Some(*category))
            }
            (Method::Get, ["export", year, category]) => {
                self.report(req, ReportKind::Export, year, Some(*category))
            }
            (_, segments) if is_known_route(segments) => {
                ApiResponse::error(405, "Method not allowed")
            }
            _ => ApiResponse::error(404, "Not found"),
        }
    }

    fn login(&self, body: &str) -> ApiResponse {
        let Ok(login) = serde_json::from_str::<LoginRequest>(body) else {
            return ApiResponse {
                status: 400,
                body: json!({ "msg": "Missing username or password" }),
            };
        };
        if let Err(e) = self.users.check(&login.username, &login.password) {
            debug!(user = %login.username, "login rejected");
            return ApiResponse::auth(401, &e);
        }
        match self.signer.issue(&login.username) {
            Ok(token) => ApiResponse::ok(json!({ "access_token": token })),
            Err(e) => ApiResponse::error(500, e.to_string()),
        }
    }

    fn report(
        &self,
        req: &ApiRequest,
        kind: ReportKind,
        year: &str,
        category: Option<&str>,
    ) -> ApiResponse {
        // Non-numeric or signed years do not match the route at all.
        let Some(year) = parse_year(year) else {
            return ApiResponse::error(404, "Not found");
        };
        if let Err(e) = self.signer.authorize(req.authorization.as_deref()) {
            return ApiResponse::auth(401, &e);
        }

        let result = ReportQuery::new(year, kind, category)
            .and_then(|query| vinha_core::fetch_report(&query, self.source.as_ref()));
        match result.map(|r| serde_json::to_value(&r)) {
            Ok(Ok(body)) => ApiResponse::ok(body),
            Ok(Err(e)) => failure(&VinhaError::Json(e)),
            Err(e) => failure(&e),
        }
    }
}

fn failure(err: &VinhaError) -> ApiResponse {
    if err.is_invalid_input() {
        return ApiResponse::error(400, "Invalid category");
    }
    match err {
        VinhaError::TableNotFound => ApiResponse::error(404, "Table not found"),
        other => {
            error!(error = %other, "report failed");
            ApiResponse::error(500, other.to_string())
        }
    }
}

fn parse_year(segment: &str) -> Option<i32> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn is_known_route(segments: &[&str]) -> bool {
    matches!(
        segments,
        [] | ["apispec.json"]
            | ["login"]
            | ["production", _]
            | ["commercialization", _]
            | ["processing" | "import" | "export", _, _]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockSource {
        html: String,
        calls: Arc<AtomicUsize>,
    }

    impl ReportSource for MockSource {
        fn fetch(&self, _url: &str) -> Result<String, VinhaError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.clone())
        }

        fn base_url(&self) -> &str {
            "http://mock/index.php"
        }
    }

    const PRODUCTION_PAGE: &str = r#"<table class="tb_base tb_dados">
        <tbody>
          <tr><td class="tb_item">VINHO DE MESA</td><td class="tb_item">169.762.429</td></tr>
          <tr><td class="tb_subitem">Tinto</td><td class="tb_subitem">139.320.884</td></tr>
          <tr><td class="tb_subitem">Branco</td><td class="tb_subitem">27.910.299</td></tr>
          <tr><td class="tb_subitem">Rosado</td><td class="tb_subitem">2.531.246</td></tr>
        </tbody>
        <tfoot class="tb_total"><tr><td>Total</td><td>200.000.000</td></tr></tfoot>
    </table>"#;

    const IMPORT_PAGE: &str = r#"<table class="tb_base tb_dados">
        <thead><tr><th>Países</th><th>Quantidade (Kg)</th><th>Valor (US$)</th></tr></thead>
        <tbody><tr><td>France</td><td>100.000</td><td>50.000,00</td></tr></tbody>
        <tfoot class="tb_total"><tr><td>Total</td><td>100.000</td><td>50.000,00</td></tr></tfoot>
    </table>"#;

    fn api(html: &str) -> (Api, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = MockSource {
            html: html.to_string(),
            calls: Arc::clone(&calls),
        };
        let users = Credentials::parse(&["admin:password123".to_string()]).unwrap();
        let signer = TokenSigner::new("router-test-secret", Duration::minutes(15));
        (Api::new(Box::new(source), signer, users), calls)
    }

    fn request(method: Method, url: &str, token: Option<&str>, body: &str) -> ApiRequest {
        ApiRequest {
            method,
            url: url.to_string(),
            authorization: token.map(|t| format!("Bearer {t}")),
            body: body.to_string(),
        }
    }

    fn login(api: &Api) -> String {
        let resp = api.handle(&request(
            Method::Post,
            "/login",
            None,
            r#"{"username": "admin", "password": "password123"}"#,
        ));
        assert_eq!(resp.status, 200);
        resp.body["access_token"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_index() {
        let (api, _) = api("");
        let resp = api.handle(&request(Method::Get, "/", None, ""));
        assert_eq!(resp, ApiResponse::ok(json!({ "message": WELCOME })));
    }

    #[test]
    fn test_login_wrong_password() {
        let (api, _) = api("");
        let resp = api.handle(&request(
            Method::Post,
            "/login",
            None,
            r#"{"username": "admin", "password": "nope"}"#,
        ));
        assert_eq!(resp.status, 401);
        assert_eq!(resp.body["msg"], "Invalid username or password");
    }

    #[test]
    fn test_login_malformed_body() {
        let (api, _) = api("");
        let resp = api.handle(&request(Method::Post, "/login", None, "{}"));
        assert_eq!(resp.status, 400);
        assert!(resp.body.get("msg").is_some());
    }

    #[test]
    fn test_production_requires_token() {
        let (api, calls) = api(PRODUCTION_PAGE);
        let resp = api.handle(&request(Method::Get, "/production/2023", None, ""));
        assert_eq!(resp.status, 401);
        assert_eq!(resp.body["msg"], "Missing Authorization Header");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_trade_routes_require_token_too() {
        let (api, calls) = api(IMPORT_PAGE);
        let resp = api.handle(&request(Method::Get, "/import/2023/table", Some("x.y"), ""));
        assert_eq!(resp.status, 401);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_production_report() {
        let (api, _) = api(PRODUCTION_PAGE);
        let token = login(&api);
        let resp = api.handle(&request(Method::Get, "/production/2023", Some(&token), ""));
        assert_eq!(resp.status, 200);
        assert_eq!(
            resp.body,
            json!({
                "ano": 2023,
                "total": "200.000.000",
                "dados": {
                    "VINHO DE MESA": {
                        "Quantidade (L.)": "169.762.429",
                        "Tinto": "139.320.884",
                        "Branco": "27.910.299",
                        "Rosado": "2.531.246"
                    }
                }
            })
        );
    }

    #[test]
    fn test_invalid_category_before_fetch() {
        let (api, calls) = api(PRODUCTION_PAGE);
        let token = login(&api);
        let resp = api.handle(&request(
            Method::Get,
            "/processing/2023/invalidcat",
            Some(&token),
            "",
        ));
        assert_eq!(resp, ApiResponse::error(400, "Invalid category"));
        assert_eq!(resp.body, json!({ "error": "Invalid category" }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_import_report() {
        let (api, _) = api(IMPORT_PAGE);
        let token = login(&api);
        let resp = api.handle(&request(Method::Get, "/import/2023/table", Some(&token), ""));
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body["data"][0]["country"], "France");
        assert_eq!(resp.body["data"][0]["quantity_kg"], 100000);
        assert_eq!(resp.body["data"][0]["value_usd"].as_f64(), Some(50000.0));
        assert_eq!(resp.body["total"]["total_quantity_kg"], 100000);
        assert_eq!(resp.body["total"]["total_value_usd"].as_f64(), Some(50000.0));
    }

    #[test]
    fn test_missing_table_is_404() {
        let (api, _) = api("<html><body>fora do ar</body></html>");
        let token = login(&api);
        let resp = api.handle(&request(
            Method::Get,
            "/commercialization/2023",
            Some(&token),
            "",
        ));
        assert_eq!(resp, ApiResponse::error(404, "Table not found"));
    }

    #[test]
    fn test_malformed_number_is_500_with_text() {
        let page = r#"<table class="tb_base tb_dados"><tbody>
            <tr><td>France</td><td>muito</td><td>1</td></tr></tbody></table>"#;
        let (api, _) = api(page);
        let token = login(&api);
        let resp = api.handle(&request(Method::Get, "/export/2023/juice", Some(&token), ""));
        assert_eq!(resp.status, 500);
        assert!(resp.body["error"].as_str().unwrap().contains("muito"));
    }

    #[test]
    fn test_routing_edges() {
        let (api, _) = api("");
        assert_eq!(
            api.handle(&request(Method::Get, "/production/abc", None, "")).status,
            404
        );
        assert_eq!(api.handle(&request(Method::Get, "/harvest", None, "")).status, 404);
        assert_eq!(api.handle(&request(Method::Get, "/login", None, "")).status, 405);
        assert_eq!(
            api.handle(&request(Method::Get, "/apispec.json?x=1", None, "")).status,
            200
        );
    }

    #[test]
    fn test_signed_year_does_not_match() {
        let (api, calls) = api(PRODUCTION_PAGE);
        let token = login(&api);
        for url in ["/production/-1", "/production/+2023", "/import/-2023/table"] {
            let resp = api.handle(&request(Method::Get, url, Some(&token), ""));
            assert_eq!(resp, ApiResponse::error(404, "Not found"), "{url}");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_missing_category_maps_to_400() {
        let err = VinhaError::MissingCategory {
            kind: ReportKind::Import,
        };
        assert_eq!(failure(&err), ApiResponse::error(400, "Invalid category"));
        assert_eq!(failure(&VinhaError::TableNotFound).status, 404);
    }
}
