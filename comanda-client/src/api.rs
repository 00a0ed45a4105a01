//! HTTP client for the comanda-server API
//!
//! Thin typed wrapper over reqwest: every call goes through the shared
//! `ApiResponse` envelope and a stored bearer token. The cart-aware
//! operations (`send_to_kitchen`, `close_table`) also keep the local
//! cart state in step with the server.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::models::{
    CatalogItem, Categoria, LoginRequest, LoginResponse, Mesa, OrdenConItems, OrdenCreate,
    OrdenItemInput, OrdenResumen, UsuarioPublico,
};
use shared::price::PriceInput;

use crate::cart::{CartBook, TableCart};
use crate::error::{CartError, ClientError, ClientResult};

/// Order plus the summary block returned on creation
#[derive(Debug, Clone, Deserialize)]
pub struct OrdenCreada {
    #[serde(flatten)]
    pub orden: OrdenConItems,
    pub resumen: OrdenResumen,
}

/// Result of closing a table
#[derive(Debug, Clone, Deserialize)]
pub struct CierreMesa {
    pub mesa: String,
    pub ordenes_cerradas: u64,
}

/// API client for comanda-server
#[derive(Debug, Clone)]
pub struct ApiService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiService {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: None,
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn auth_header(&self) -> Option<String> {
        self.token.as_ref().map(|t| format!("Bearer {t}"))
    }

    /// Make a GET request
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.get(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        Self::handle_response(request.send().await?).await
    }

    /// Make a POST request with JSON body
    async fn post<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path)).json(body);
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        Self::handle_response(request.send().await?).await
    }

    /// Make a POST request without body
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let mut request = self.client.post(self.url(path));
        if let Some(auth) = self.auth_header() {
            request = request.header(reqwest::header::AUTHORIZATION, auth);
        }
        Self::handle_response(request.send().await?).await
    }

    /// Unwrap the `ApiResponse` envelope, mapping error statuses
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::UNAUTHORIZED {
                return Err(ClientError::Unauthorized);
            }
            let text = response.text().await?;
            let message = serde_json::from_str::<ApiResponse<()>>(&text)
                .map(|envelope| envelope.message)
                .unwrap_or(text);
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ApiResponse<T> = response.json().await?;
        envelope
            .data
            .ok_or_else(|| ClientError::InvalidResponse("Missing response data".to_string()))
    }

    // ========== Auth ==========

    /// Login and store the returned token for subsequent calls
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<UsuarioPublico> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self.post("/api/auth/login", &request).await?;
        self.token = Some(response.token);
        Ok(response.usuario)
    }

    // ========== Catalog ==========

    /// Unified menu: regular items plus currently valid specials
    pub async fn get_menu(&self) -> ClientResult<Vec<CatalogItem>> {
        self.get("/api/menu").await
    }

    pub async fn get_categorias(&self) -> ClientResult<Vec<Categoria>> {
        self.get("/api/categorias").await
    }

    pub async fn get_mesas(&self) -> ClientResult<Vec<Mesa>> {
        self.get("/api/mesas").await
    }

    // ========== Orders ==========

    pub async fn get_order(&self, orden_id: i64) -> ClientResult<OrdenConItems> {
        self.get(&format!("/api/ordenes/{orden_id}")).await
    }

    pub async fn get_active_orders(&self) -> ClientResult<Vec<OrdenConItems>> {
        self.get("/api/ordenes/activas").await
    }

    pub async fn create_order(&self, payload: &OrdenCreate) -> ClientResult<OrdenCreada> {
        self.post("/api/ordenes", payload).await
    }

    pub async fn add_items(
        &self,
        orden_id: i64,
        items: Vec<OrdenItemInput>,
    ) -> ClientResult<OrdenConItems> {
        #[derive(serde::Serialize)]
        struct ItemsBody {
            items: Vec<OrdenItemInput>,
        }
        self.post(&format!("/api/ordenes/{orden_id}/items"), &ItemsBody { items })
            .await
    }

    /// Send a table's staged lines to the kitchen.
    ///
    /// Creates the order on the first send and appends to it afterwards;
    /// staged lines move to `enviados` only when the server accepted them.
    pub async fn send_to_kitchen(
        &self,
        mesa: &str,
        cart: &mut TableCart,
    ) -> ClientResult<OrdenConItems> {
        if cart.nuevos.is_empty() {
            return Err(CartError::NothingToSend.into());
        }
        let items = items_payload(cart);

        let orden = match cart.orden_id {
            Some(orden_id) => self.add_items(orden_id, items).await?,
            None => {
                let payload = OrdenCreate {
                    mesa: mesa.to_string(),
                    items,
                    notas: None,
                    cliente: None,
                    total: Some(PriceInput::Numero(cart.total())),
                };
                let creada = self.create_order(&payload).await?;
                cart.orden_id = Some(creada.resumen.numero_orden);
                creada.orden
            }
        };

        cart.mark_sent();
        Ok(orden)
    }

    /// Close a table: deliver its open orders server-side and drop the
    /// local cart. Refused while unsent lines remain.
    pub async fn close_table(&self, mesa: &Mesa, book: &mut CartBook) -> ClientResult<CierreMesa> {
        if let Some(cart) = book.cart(mesa.id) {
            let count = cart.pending_count();
            if count > 0 {
                return Err(CartError::PendingItems { count }.into());
            }
        }

        let cierre: CierreMesa = self
            .post_empty(&format!("/api/ordenes/mesa/{}/cerrar", mesa.nombre))
            .await?;

        // Pending guard already passed, removal cannot fail
        let _ = book.close_table(mesa.id);
        Ok(cierre)
    }
}

/// Order line payload for every staged line of a cart
fn items_payload(cart: &TableCart) -> Vec<OrdenItemInput> {
    cart.nuevos
        .iter()
        .map(|line| OrdenItemInput {
            menu_item_id: line.item_id,
            cantidad: line.cantidad,
            precio: PriceInput::Numero(line.precio),
            es_especial: line.es_especial,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartLine;
    use rust_decimal::Decimal;

    fn line(item_id: i64, es_especial: bool, cantidad: i32, precio: &str) -> CartLine {
        CartLine {
            item_id,
            es_especial,
            nombre: format!("Plato {item_id}"),
            precio: precio.parse().unwrap(),
            cantidad,
        }
    }

    #[test]
    fn test_items_payload_covers_staged_lines_only() {
        let mut cart = TableCart::default();
        cart.add(line(1, false, 2, "10.00"));
        cart.mark_sent();
        cart.add(line(2, true, 1, "15.50"));

        let items = items_payload(&cart);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].menu_item_id, 2);
        assert!(items[0].es_especial);
        assert_eq!(items[0].cantidad, 1);
        match &items[0].precio {
            PriceInput::Numero(d) => assert_eq!(*d, "15.50".parse::<Decimal>().unwrap()),
            PriceInput::Texto(t) => panic!("expected numeric price, got {t:?}"),
        }
    }

    #[test]
    fn test_url_joining() {
        let api = ApiService::new("http://localhost:3000/").unwrap();
        assert_eq!(api.url("/api/menu"), "http://localhost:3000/api/menu");
        assert_eq!(api.url("api/menu"), "http://localhost:3000/api/menu");
    }

    #[tokio::test]
    async fn test_close_table_guard_blocks_before_any_request() {
        // Unroutable endpoint: the pending-lines guard must fire first
        let api = ApiService::new("http://127.0.0.1:9").unwrap();
        let mesa = Mesa {
            id: 4,
            nombre: "Mesa 4".into(),
            estado: "ocupada".into(),
            activa: true,
        };
        let mut book = CartBook::new();
        book.cart_mut(mesa.id).add(line(1, false, 2, "10.00"));

        let err = api.close_table(&mesa, &mut book).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Cart(CartError::PendingItems { count: 2 })
        ));
        // Cart untouched after the refusal
        assert_eq!(book.cart(mesa.id).unwrap().pending_count(), 2);
    }

    #[test]
    fn test_cierre_mesa_deserializes() {
        let json = r#"{"mesa":"Mesa 4","ordenes_cerradas":2}"#;
        let cierre: CierreMesa = serde_json::from_str(json).unwrap();
        assert_eq!(cierre.mesa, "Mesa 4");
        assert_eq!(cierre.ordenes_cerradas, 2);
    }
}
