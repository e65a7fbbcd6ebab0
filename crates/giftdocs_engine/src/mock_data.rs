/* 📖 # Where does the canned data come from?

Every response the simulator returns is assembled from the literals in this
module. Pages that showed the same record in slightly different shapes share one
canonical version here, so the profile on the overview and on its own page are
identical.
*/

use serde_json::{Value, json};

use crate::endpoint::EndpointId;

pub const DEMO_MOBILE: &str = "9182XXXXX94";
pub const DEMO_PASSWORD: &str = "test@123";
pub const DEMO_AUTHCODE: &str = "128636";

pub const LOGIN_TOKEN: &str =
    "eyJ0eXAiOiJKV1QiLCJhbGciOiJIUzI1NiJ9.eyJpYXQiOjE3NTEyODI4NzAsIm5iZiI6MTc1";

pub const DEFAULT_PRODUCT_ID: u64 = 694;
pub const DEFAULT_ORDER_ID: u64 = 3466838;
pub const DEFAULT_INVOICE_ID: &str = "ZP1111799";

/// Request payload of the shipped sample, if the endpoint takes one.
pub fn default_payload(endpoint: EndpointId) -> Option<Value> {
    match endpoint {
        EndpointId::Login => Some(json!({
            "mobile": DEMO_MOBILE,
            "password": DEMO_PASSWORD,
            "authcode": DEMO_AUTHCODE
        })),
        EndpointId::ProductList => Some(product_query("")),
        EndpointId::ProductSearch => Some(product_query("Amazone")),
        EndpointId::OrderPlace => Some(order_payload()),
        EndpointId::OrderReport => Some(json!({
            "search": null,
            "filterBy": null,
            "date": {
                "from": "2025/05/30",
                "to": "2025/06/30"
            },
            "pagination": {
                "sortBy": "id",
                "descending": true,
                "page": 1,
                "rowsPerPage": 10,
                "rowsNumber": 0
            },
            "status": 0
        })),
        EndpointId::VoucherDetails => Some(json!({
            "search": null,
            "filterBy": null,
            "pagination": {
                "sortBy": "id",
                "descending": false,
                "page": 1,
                "rowsPerPage": 100000000,
                "rowsNumber": 0
            }
        })),
        EndpointId::WalletStatement => Some(json!({
            "date": {
                "from": "2025/05/30",
                "to": "2025/06/30"
            },
            "pagination": {
                "sortBy": "id",
                "descending": true,
                "page": 1,
                "rowsPerPage": 10,
                "rowsNumber": 0
            }
        })),
        EndpointId::Profile | EndpointId::ProductDetails | EndpointId::VoucherStatus => None,
    }
}

/// Value substituted into the path template of the shipped sample.
pub fn default_path_value(endpoint: EndpointId) -> Option<String> {
    match endpoint {
        EndpointId::ProductDetails => Some(DEFAULT_PRODUCT_ID.to_string()),
        EndpointId::VoucherDetails => Some(DEFAULT_ORDER_ID.to_string()),
        EndpointId::VoucherStatus => Some(DEFAULT_INVOICE_ID.to_string()),
        _ => None,
    }
}

fn product_query(search: &str) -> Value {
    json!({
        "search": search,
        "filterBy": "title",
        "selectedCategories": [],
        "pagination": {
            "sortBy": "id",
            "descending": false,
            "page": 1,
            "rowsPerPage": 0,
            "rowsNumber": 0
        }
    })
}

/// The order sent, encrypted, to the order place endpoint.
pub fn order_payload() -> Value {
    json!({
        "productId": 694,
        "walletPayment": true,
        "emailID": "test@99gift.in",
        "mobileNo": "82XXXXXX94",
        "customerName": "Test",
        "denominations": [
            {
                "amount": 10,
                "corp_discount": 3,
                "quantity": 1,
                "product_id": "694",
                "subproduct_id": 1737,
                "PRODUCTCODE": "GOOL10",
                "ProductGuid": "GOOL10",
                "skuID": "OFFGOOGLENW"
            }
        ],
        "skuID": "OFFGOOGLENW",
        "corp_order": true,
        "corp_discount": 3,
        "authcode": "98XX98"
    })
}

pub fn user_detail() -> Value {
    json!({
        "id": 188699,
        "email": "corptest@99gift.in",
        "mobile": DEMO_MOBILE,
        "balance": 180.6,
        "name": "Test"
    })
}

pub fn profile() -> Value {
    json!({
        "id": 188699,
        "name": "Amarnath",
        "mobile": DEMO_MOBILE,
        "email": "corptest@99gift.in",
        "balance": 180.6,
        "corporate_name": null,
        "pin_code": null
    })
}

/// Catalog rows of the product list endpoint.
pub fn products() -> Vec<Value> {
    vec![
        json!({
            "id": 694,
            "sku": "OFFGOOGLENW",
            "title": "Google Play E-Gift Voucher",
            "image": "https://99paisa.s3.amazonaws.com/fund--request/cQXcnF2zu4BXaWaD7UWXG3y5bZ7Ld5RmIgL13k2p.jpg",
            "website": 1,
            "store": 0,
            "min_price": 10,
            "max_price": 50,
            "discount_type": "percentage",
            "points": 0,
            "corp_discount": 3,
            "category": {
                "id": 6,
                "title": "Entertainment",
                "status": 1
            }
        }),
        json!({
            "id": 695,
            "sku": "OFFAMAZONNW",
            "title": "Amazon Pay E-Gift Voucher",
            "image": "https://99paisa.s3.amazonaws.com/fund--request/amazon_voucher.jpg",
            "website": 1,
            "store": 0,
            "min_price": 100,
            "max_price": 1000,
            "discount_type": "percentage",
            "points": 0,
            "corp_discount": 5,
            "category": {
                "id": 6,
                "title": "Entertainment",
                "status": 1
            }
        }),
        json!({
            "id": 696,
            "sku": "FLIPKARTGV",
            "title": "Flipkart Gift Voucher",
            "image": "https://99paisa.s3.amazonaws.com/fund--request/flipkart_voucher.jpg",
            "website": 1,
            "store": 0,
            "min_price": 500,
            "max_price": 5000,
            "discount_type": "percentage",
            "points": 0,
            "corp_discount": 4,
            "category": {
                "id": 7,
                "title": "Shopping",
                "status": 1
            }
        }),
    ]
}

/// Brand the product search endpoint is restricted to.
pub const SEARCHABLE_BRAND: &str = "amazon";

const ENTERTAINMENT_IMAGE: &str = "https://99paisa.s3.ap-south-1.amazonaws.com/fund--request/5UO8u0hPnTQWpnlKW3nieM0dutrRWA5YJLk8Bj8s.gif";

pub fn product_details(product_id: u64) -> Option<Value> {
    match product_id {
        694 => Some(json!({
            "id": 694,
            "routing_api_id": null,
            "title": "Google Play E-Gift Voucher",
            "image": "https://99paisa.s3.ap-south-1.amazonaws.com/fund--request/cQXcnF2zu4BXaWaD7UWXG3y5bZ7Ld5RmIgL13k2p.jpg",
            "description": "A lot more Play. All on your Android.\r\nPower up in over ",
            "terms": "1.Anti-fraud warning\n2.Any other request for the code may be a scam.\n3.Terms and Conditions\n4.Users must be India residents aged 18+",
            "moreInfo": null,
            "redeem": "To redeem, enter code in the Play Store app or play.google.com",
            "min_price": 10,
            "max_price": 50,
            "discount_type": "percentage",
            "corp_discount": 3,
            "denomination": [
                {
                    "subproduct_id": 1737,
                    "product_id": "694",
                    "amount": 10,
                    "PRODUCTCODE": "GOOL10",
                    "ProductGuid": "GOOL10",
                    "skuID": null,
                    "stock_left": 169
                }
            ],
            "brand": {
                "id": 187,
                "title": "Google Play Card",
                "image": "https://www.verdict.co.uk/wp-content/uploads/2018/11/shutterstock_712915198-e1542045457155.jpg"
            },
            "category": {
                "id": 6,
                "title": "Entertainment",
                "image": ENTERTAINMENT_IMAGE
            }
        })),
        // no denominations: out of stock
        695 => Some(json!({
            "id": 695,
            "routing_api_id": null,
            "title": "Amazon Pay E-Gift Voucher",
            "image": "https://99paisa.s3.amazonaws.com/fund--request/amazon_voucher.jpg",
            "description": "Amazon Pay gift cards can be used to purchase crores of products on Amazon.in",
            "terms": "1.Redeemable only on Amazon.in\n2.Valid for 10 years from date of issue\n3.No cash withdrawal",
            "moreInfo": null,
            "redeem": "Redeemable on Amazon.in website or mobile app",
            "min_price": 100,
            "max_price": 1000,
            "discount_type": "percentage",
            "corp_discount": 5,
            "denomination": [],
            "brand": {
                "id": 188,
                "title": "Amazon Pay",
                "image": "https://99paisa.s3.amazonaws.com/fund--request/amazon_voucher.jpg"
            },
            "category": {
                "id": 6,
                "title": "Entertainment",
                "image": ENTERTAINMENT_IMAGE
            }
        })),
        _ => None,
    }
}

pub fn order_confirmation() -> Value {
    json!({
        "orderId": "ZPXXXX120",
        "gateway": false,
        "totalAmount": 9.7,
        "walletPaid": 9.7,
        "product_info": null
    })
}

pub fn order_report_rows() -> Vec<Value> {
    vec![json!({
        "id": 3466838,
        "invoice_id": DEFAULT_INVOICE_ID,
        "ProductGuid": "GOOL10",
        "PRODUCTCODE": "GOOL10",
        "amount": 10,
        "qty": 1,
        "discounted_value": 0.3,
        "corp_discount": 3,
        "gross_amount": 10,
        "net_amount": 9.7,
        "opening_balance": 190.3,
        "closing_balance": 180.6,
        "paymentType": "wallet",
        "customerName": "xxxx kumar",
        "mobileNo": "",
        "emailID": "xxxxxx@gmail.com",
        "remark": null,
        "description": null,
        "created_at": "2025-06-27T05:39:26.000000Z",
        "product": {
            "id": 694,
            "title": "Google Play E-Gift Voucher",
            "image": "https://99paisa.s3.ap-south-1.amazonaws.com/fund--request/cQXcn.jpg"
        },
        "status": {
            "id": 1,
            "status": "Success"
        }
    })]
}

pub const VOUCHER_DETAILS_DURATION: f64 = 0.004853010177612305;

/// Order header of the voucher details response, echoing the requested order id.
pub fn voucher_order(order_id: u64) -> Value {
    json!({
        "id": order_id,
        "invoice_id": DEFAULT_INVOICE_ID,
        "user_id": 188699,
        "api_id": 7,
        "product_id": 694,
        "subproduct_id": 1737,
        "ProductGuid": "GOOL10",
        "PRODUCTCODE": "GOOL10",
        "amount": 10,
        "qty": 1,
        "discounted_value": 0.3,
        "corp_discount": 3,
        "gross_amount": 10,
        "net_amount": 9.7,
        "opening_balance": 190.3,
        "closing_balance": 180.6,
        "paymentType": "wallet",
        "customerName": "Amarnath kumar",
        "mobileNo": "",
        "emailID": "XXXXX@gmail.com",
        "txnid": null,
        "remark": null,
        "description": null,
        "status_id": 1,
        "created_at": "2025-06-27T05:39:26.000000Z",
        "updated_at": "2025-06-27T05:39:26.000000Z",
        "product": {
            "id": 694,
            "title": "Google Play E-Gift Voucher",
            "image": "https://99paisa.s3.ap-south-1.amazonaws.com/fund--request/cQXcnF2zu4BXaWaD7UWXG3y5bZ7Ld5RmIgL13k2p.jpg"
        }
    })
}

pub fn vouchers() -> Vec<Value> {
    vec![json!({
        "id": 2639649,
        "user_id": "XXXX",
        "api_id": 7,
        "report_id": "XXXX",
        "ProductName": "Google Play E-Gift Voucher",
        "VoucherName": "Google Play E-Gift Voucher - RS 10",
        "VoucherGuid": "",
        "view_code": null,
        "VoucherGCcode": "",
        "Value": "10",
        "VoucherNo": "5302992854360359",
        "Voucherpin": "DN3UWMFS10F7NVBJ",
        "EndDate": "2025-01-01",
        "status": 1,
        "date": "2025-06-27T05:39:26.000000Z"
    })]
}

pub fn voucher_status(invoice_id: &str) -> Option<Value> {
    (invoice_id == DEFAULT_INVOICE_ID).then(|| {
        json!({
            "invoice_id": DEFAULT_INVOICE_ID,
            "order_id": DEFAULT_ORDER_ID,
            "product_id": 694,
            "ProductName": "Google Play E-Gift Voucher",
            "amount": 10,
            "net_amount": 9.7,
            "voucher_count": 1,
            "status_id": 1,
            "status": "Success",
            "updated_at": "2025-06-27T05:39:26.000000Z"
        })
    })
}

pub fn wallet_statement_rows() -> Vec<Value> {
    vec![
        json!({
            "id": 912044,
            "txn_type": "debit",
            "amount": 9.7,
            "opening_balance": 190.3,
            "closing_balance": 180.6,
            "reference": DEFAULT_INVOICE_ID,
            "remark": "Gift card order",
            "created_at": "2025-06-27T05:39:26.000000Z"
        }),
        json!({
            "id": 911870,
            "txn_type": "credit",
            "amount": 190.3,
            "opening_balance": 0,
            "closing_balance": 190.3,
            "reference": "FUND-20250620-0012",
            "remark": "Wallet top-up",
            "created_at": "2025-06-20T10:12:03.000000Z"
        }),
    ]
}
