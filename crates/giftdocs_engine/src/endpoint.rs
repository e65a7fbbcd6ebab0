use giftdocs_base::http::HttpMethod;
use serde::{Deserialize, Serialize};

use crate::gate::AuthRule;

/// Identifier of one documented endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointId {
    Login,
    Profile,
    ProductList,
    ProductSearch,
    ProductDetails,
    OrderPlace,
    OrderReport,
    VoucherDetails,
    VoucherStatus,
    WalletStatement,
}

impl EndpointId {
    /// Navigation order of the documentation pages.
    pub const ALL: [EndpointId; 10] = [
        EndpointId::Login,
        EndpointId::Profile,
        EndpointId::ProductList,
        EndpointId::ProductSearch,
        EndpointId::ProductDetails,
        EndpointId::OrderPlace,
        EndpointId::OrderReport,
        EndpointId::VoucherDetails,
        EndpointId::VoucherStatus,
        EndpointId::WalletStatement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Profile => "profile",
            Self::ProductList => "product-list",
            Self::ProductSearch => "product-search",
            Self::ProductDetails => "product-details",
            Self::OrderPlace => "order-place",
            Self::OrderReport => "order-report",
            Self::VoucherDetails => "voucher-details",
            Self::VoucherStatus => "voucher-status",
            Self::WalletStatement => "wallet-statement",
        }
    }

    /// Parse an endpoint id. Page route names such as `login-api` are accepted too.
    pub fn parse(id: &str) -> Option<Self> {
        let id = id.trim().to_ascii_lowercase();
        let id = id.strip_suffix("-api").unwrap_or(&id);
        Self::ALL.into_iter().find(|candidate| candidate.as_str() == id)
    }

    pub fn definition(&self) -> &'static EndpointDefinition {
        &CATALOG[*self as usize]
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a documented endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDefinition {
    pub id: EndpointId,
    pub title: &'static str,
    pub method: HttpMethod,
    /// Path template on the documented API host, e.g. `/product/infos/{productId}`.
    pub path: &'static str,
    pub summary: &'static str,
    pub auth: AuthRule,
    /// Message of the error response when `auth` rejects a request.
    pub denial_message: &'static str,
    /// Id read back out of the request URL, for templated paths.
    pub path_parameter: Option<PathParameter>,
}

/// A path segment the simulator reads from the sample's URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParameter {
    /// Name of the placeholder in [`EndpointDefinition::path`].
    pub name: &'static str,
    /// Human label used in extraction errors.
    pub label: &'static str,
    /// Regex with one capture group for the value.
    pub pattern: &'static str,
}

const INVALID_CREDENTIALS: &str = "Invalid API key or credentials";
const TOKEN_REQUIRED: &str = "Authorization token is required";

/// Ordered like [`EndpointId::ALL`], so an id's discriminant is its index.
static CATALOG: [EndpointDefinition; 10] = [
    EndpointDefinition {
        id: EndpointId::Login,
        title: "Login API",
        method: HttpMethod::Post,
        path: "/user/login-Corporate/merchant",
        summary: "Authenticate a corporate merchant with mobile number, password and 2FA code. Returns the bearer token used by every other endpoint.",
        auth: AuthRule::AllowListed {
            field: "mobile",
            allowed: &["9182XXXXX94"],
            case_insensitive: false,
        },
        denial_message: INVALID_CREDENTIALS,
        path_parameter: None,
    },
    EndpointDefinition {
        id: EndpointId::Profile,
        title: "Profile API",
        method: HttpMethod::Get,
        path: "/user/validate-token",
        summary: "Validate the bearer token and return the merchant profile with its wallet balance.",
        auth: AuthRule::BearerMarker,
        denial_message: TOKEN_REQUIRED,
        path_parameter: None,
    },
    EndpointDefinition {
        id: EndpointId::ProductList,
        title: "Product List API",
        method: HttpMethod::Post,
        path: "/list",
        summary: "List gift card products, filtered by search term and categories, with pagination.",
        auth: AuthRule::BearerMarker,
        denial_message: INVALID_CREDENTIALS,
        path_parameter: None,
    },
    EndpointDefinition {
        id: EndpointId::ProductSearch,
        title: "Product Search API",
        method: HttpMethod::Post,
        path: "/list",
        summary: "Search the catalog for a brand by name.",
        auth: AuthRule::AllowListed {
            field: "search",
            allowed: &["amazon", "amazone"],
            case_insensitive: true,
        },
        denial_message: INVALID_CREDENTIALS,
        path_parameter: None,
    },
    EndpointDefinition {
        id: EndpointId::ProductDetails,
        title: "Product Details API",
        method: HttpMethod::Get,
        path: "/product/infos/{productId}",
        summary: "Fetch one product with its denominations, stock, brand, terms and redemption steps.",
        auth: AuthRule::Open,
        denial_message: INVALID_CREDENTIALS,
        path_parameter: Some(PathParameter {
            name: "productId",
            label: "product id",
            pattern: r"product/infos/(\d+)",
        }),
    },
    EndpointDefinition {
        id: EndpointId::OrderPlace,
        title: "Order Place API",
        method: HttpMethod::Put,
        path: "/gift/order-create-corporate",
        summary: "Place a gift card order paid from the wallet. The order payload is sent AES-256-CBC encrypted.",
        auth: AuthRule::BearerMarker,
        denial_message: TOKEN_REQUIRED,
        path_parameter: None,
    },
    EndpointDefinition {
        id: EndpointId::OrderReport,
        title: "Order Report API",
        method: HttpMethod::Post,
        path: "/user/reports/0",
        summary: "List placed orders in a date range with amounts, discounts and balances.",
        auth: AuthRule::BearerMarker,
        denial_message: TOKEN_REQUIRED,
        path_parameter: None,
    },
    EndpointDefinition {
        id: EndpointId::VoucherDetails,
        title: "Voucher Details API",
        method: HttpMethod::Post,
        path: "/user/card-list/{orderId}",
        summary: "Fetch the voucher codes and pins issued for an order.",
        auth: AuthRule::BearerMarker,
        denial_message: TOKEN_REQUIRED,
        path_parameter: Some(PathParameter {
            name: "orderId",
            label: "order id",
            pattern: r"card-list/(\d+)",
        }),
    },
    EndpointDefinition {
        id: EndpointId::VoucherStatus,
        title: "Voucher Status API",
        method: HttpMethod::Get,
        path: "/user/voucher-status/{invoiceId}",
        summary: "Check the fulfilment status of an order by its invoice id.",
        auth: AuthRule::BearerMarker,
        denial_message: TOKEN_REQUIRED,
        path_parameter: Some(PathParameter {
            name: "invoiceId",
            label: "invoice id",
            pattern: r"voucher-status/([A-Za-z0-9]+)",
        }),
    },
    EndpointDefinition {
        id: EndpointId::WalletStatement,
        title: "Wallet Statement API",
        method: HttpMethod::Post,
        path: "/user/wallet-statement",
        summary: "List wallet credits and debits in a date range with running balances.",
        auth: AuthRule::BearerMarker,
        denial_message: TOKEN_REQUIRED,
        path_parameter: None,
    },
];

/// All endpoint definitions in navigation order.
pub fn catalog() -> &'static [EndpointDefinition] {
    &CATALOG
}

/* 📖 # How is the catalog searched?

A case-insensitive substring match, scored so that title hits rank above hits
in the path or summary. Ten entries do not need an index.
*/

/// Search the catalog. An empty query returns every endpoint.
pub fn search_catalog(query: &str) -> Vec<&'static EndpointDefinition> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return CATALOG.iter().collect();
    }
    let mut scored: Vec<(usize, &'static EndpointDefinition)> = CATALOG
        .iter()
        .filter_map(|definition| {
            let title = definition.title.to_lowercase().contains(&query);
            let path = definition.path.to_lowercase().contains(&query)
                || definition.id.as_str().contains(&query);
            let summary = definition.summary.to_lowercase().contains(&query);
            let score = usize::from(title) * 100 + usize::from(path) * 10 + usize::from(summary);
            (score > 0).then_some((score, definition))
        })
        .collect();
    // stable sort keeps navigation order among equal scores
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, definition)| definition).collect()
}
