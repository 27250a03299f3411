//! End-to-end proxy behavior: rotation, failover, and relay semantics.

mod common;

use common::{client, dead_address, proxy_config, spawn_proxy, start_backend, start_healthy_backend};

#[tokio::test]
async fn health_check_path_bypasses_the_pool() {
    // No backends at all; the health path must still answer.
    let (proxy, _shutdown) = spawn_proxy(proxy_config(&[])).await;

    let res = client()
        .get(format!("http://{proxy}/balancer/health"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn requests_rotate_across_healthy_backends() {
    let alpha = start_healthy_backend("alpha").await;
    let beta = start_healthy_backend("beta").await;
    let (proxy, _shutdown) = spawn_proxy(proxy_config(&[alpha, beta])).await;

    let client = client();
    let mut bodies = Vec::new();
    for _ in 0..4 {
        let res = client
            .get(format!("http://{proxy}/anything"))
            .send()
            .await
            .expect("proxy unreachable");
        assert_eq!(res.status(), 200);
        bodies.push(res.text().await.unwrap());
    }

    assert_eq!(bodies, vec!["alpha", "beta", "alpha", "beta"]);
}

#[tokio::test]
async fn failover_skips_a_dead_backend() {
    let dead = dead_address().await;
    let alive = start_healthy_backend("alive").await;
    let (proxy, _shutdown) = spawn_proxy(proxy_config(&[dead, alive])).await;

    let client = client();
    for _ in 0..3 {
        let res = client
            .get(format!("http://{proxy}/work"))
            .send()
            .await
            .expect("proxy unreachable");
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), "alive");
    }
}

#[tokio::test]
async fn all_backends_down_yields_service_unavailable() {
    let dead_a = dead_address().await;
    let dead_b = dead_address().await;
    let (proxy, _shutdown) = spawn_proxy(proxy_config(&[dead_a, dead_b])).await;

    let res = client()
        .get(format!("http://{proxy}/work"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(res.status(), 503);
}

#[tokio::test]
async fn empty_pool_yields_service_unavailable() {
    let (proxy, _shutdown) = spawn_proxy(proxy_config(&[])).await;

    let res = client()
        .get(format!("http://{proxy}/work"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(res.status(), 503);
}

#[tokio::test]
async fn backend_status_codes_pass_through_verbatim() {
    // Healthy on the probe route, 404 everywhere else: the 404 must reach
    // the client untouched, not be treated as a proxy failure.
    let backend = start_backend(|path| {
        if path == "/health" {
            (200, "ok".to_string())
        } else {
            (404, "no such thing".to_string())
        }
    })
    .await;
    let (proxy, _shutdown) = spawn_proxy(proxy_config(&[backend])).await;

    let res = client()
        .get(format!("http://{proxy}/missing"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(res.status(), 404);
    assert_eq!(res.text().await.unwrap(), "no such thing");
}

#[tokio::test]
async fn path_and_query_reach_the_backend_intact() {
    let backend = start_backend(|path| {
        if path == "/health" {
            (200, "ok".to_string())
        } else {
            (200, path.to_string())
        }
    })
    .await;
    let (proxy, _shutdown) = spawn_proxy(proxy_config(&[backend])).await;

    let res = client()
        .get(format!("http://{proxy}/api/v1/items?page=2"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(res.text().await.unwrap(), "/api/v1/items?page=2");
}

#[tokio::test]
async fn recovered_backend_rejoins_the_rotation() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    // Alpha starts out failing its health probe, then recovers.
    let alpha_up = Arc::new(AtomicBool::new(false));
    let alpha_flag = alpha_up.clone();
    let alpha = start_backend(move |path| {
        if path == "/health" {
            if alpha_flag.load(Ordering::SeqCst) {
                (200, "ok".to_string())
            } else {
                (503, "warming up".to_string())
            }
        } else {
            (200, "alpha".to_string())
        }
    })
    .await;
    let beta = start_healthy_backend("beta").await;
    let (proxy, _shutdown) = spawn_proxy(proxy_config(&[alpha, beta])).await;

    let client = client();

    // While alpha is unhealthy, everything fails over to beta.
    for _ in 0..2 {
        let res = client
            .get(format!("http://{proxy}/work"))
            .send()
            .await
            .expect("proxy unreachable");
        assert_eq!(res.text().await.unwrap(), "beta");
    }

    // Alpha recovers; it is never evicted, so its next turn serves again.
    alpha_up.store(true, Ordering::SeqCst);
    let res = client
        .get(format!("http://{proxy}/work"))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(res.text().await.unwrap(), "alpha");
}
