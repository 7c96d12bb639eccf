use std::net::SocketAddr;
use std::time::Duration;

use payu_gateway::{app, config::Config, state::AppState, store::sweeper::SweepTask};
use serde_json::{Value, json};

// Shared test context
struct TestContext {
    client: reqwest::Client,
    base_url: String,
    state: AppState,
}

impl TestContext {
    async fn start(configure: impl FnOnce(&mut Config)) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let mut config = Config::sandbox(&base_url);
        configure(&mut config);
        let state = AppState::new(&config);

        let router = app::router(state.clone());
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        Self {
            client: reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .unwrap(),
            base_url,
            state,
        }
    }

    async fn checkout(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/payu/checkout", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_full_checkout_flow() {
        let context = TestContext::start(|_| {}).await;

        // Step 1: Start checkout
        let checkout_response = context
            .checkout(json!({
                "amount": "10",
                "reference": "R1",
                "currency": "COP",
                "buyerEmail": "ana@example.com"
            }))
            .await;
        assert_eq!(checkout_response.status().as_u16(), 200, "Checkout failed");

        let checkout_body: Value = checkout_response.json().await.unwrap();
        assert_eq!(checkout_body["ok"], true);
        assert_eq!(checkout_body["fields"]["amount"], "10.00");
        assert_eq!(checkout_body["fields"]["buyerEmail"], "ana@example.com");
        assert_eq!(
            checkout_body["fields"]["responseUrl"],
            format!("{}/payu/response", context.base_url)
        );
        assert_eq!(
            checkout_body["fields"]["signature"],
            context.state.signer.sign("R1", "10.00", "COP")
        );

        let pay_url = checkout_body["payUrl"].as_str().unwrap().to_string();
        assert!(pay_url.starts_with(&format!("{}/payu/redirect/", context.base_url)));

        // Step 2: Open the pay link
        let redirect_response = context.client.get(&pay_url).send().await.unwrap();
        assert_eq!(redirect_response.status().as_u16(), 200, "Redirect page failed");
        let html = redirect_response.text().await.unwrap();
        assert_eq!(html.matches(r#"type="hidden""#).count(), 11);
        assert!(html.contains(r#"name="amount" value="10.00""#));
        assert!(html.contains(r#"name="referenceCode" value="R1""#));

        // Step 3: Processor confirms server-to-server
        let confirm_response = context
            .client
            .post(format!("{}/api/payu/confirm", context.base_url))
            .header("X-Forwarded-For", "203.0.113.9")
            .form(&[
                ("reference_sale", "R1"),
                ("state_pol", "4"),
                ("transaction_id", "tx-1"),
                ("sign", "abc"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(confirm_response.status().as_u16(), 200, "Webhook failed");
        assert!(confirm_response.text().await.unwrap().is_empty());

        // Step 4: Buyer comes back
        let return_response = context
            .client
            .get(format!(
                "{}/payu/response?referenceCode=R1&transactionState=4&lapTransactionState=APPROVED",
                context.base_url
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(return_response.status().as_u16(), 200, "Response page failed");
        assert!(return_response.text().await.unwrap().contains("APPROVED"));
    }

    #[tokio::test]
    async fn test_checkout_rejections() {
        let context = TestContext::start(|_| {}).await;

        let missing = context.checkout(json!({ "amount": "10" })).await;
        assert_eq!(missing.status().as_u16(), 400);
        let missing_body: Value = missing.json().await.unwrap();
        assert_eq!(missing_body["ok"], false);
        assert!(missing_body["error"].is_string());

        let not_a_number = context
            .checkout(json!({ "amount": "ten", "reference": "R1" }))
            .await;
        assert_eq!(not_a_number.status().as_u16(), 400);

        assert!(context.state.sessions.is_empty().await);

        let unknown = context
            .client
            .get(format!("{}/payu/redirect/unknown-token", context.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(unknown.status().as_u16(), 410);
    }

    #[tokio::test]
    async fn test_pay_link_expires_and_is_swept() {
        let context = TestContext::start(|config| {
            config.session_ttl = Duration::from_secs(1);
            config.sweep_interval = Duration::from_millis(200);
        })
        .await;
        let sweeper = SweepTask::spawn(
            context.state.sessions.clone(),
            context.state.config.sweep_interval,
        );

        let checkout_body: Value = context
            .checkout(json!({ "amount": "10", "reference": "R1" }))
            .await
            .json()
            .await
            .unwrap();
        let pay_url = checkout_body["payUrl"].as_str().unwrap().to_string();

        let fresh = context.client.get(&pay_url).send().await.unwrap();
        assert_eq!(fresh.status().as_u16(), 200);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(context.state.sessions.is_empty().await, "sweeper did not run");

        let expired = context.client.get(&pay_url).send().await.unwrap();
        assert_eq!(expired.status().as_u16(), 410);

        sweeper.shutdown().await;
    }

    #[tokio::test]
    async fn test_health() {
        let context = TestContext::start(|_| {}).await;

        let response = context
            .client
            .get(format!("{}/api", context.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.unwrap();
        assert_eq!(body["conexion"], "ok");
        assert_eq!(body["baseUrl"], context.base_url);
    }
}
