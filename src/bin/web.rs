use std::boxed::Box;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::env;
use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::runtime::Builder as RuntimeBuilder;
use tower_http::cors::CorsLayer;

use artisanhub::api::web::route_table;
use artisanhub::confidentiality::{self, AbstractConfidentiality};
use artisanhub::constant::EXPECTED_ENV_VAR_LABELS;
use artisanhub::logging::{app_log_event, AppLogContext, AppLogLevel};
use artisanhub::network::{app_web_service, middleware, net_listener};
use artisanhub::{AppConfig, AppSharedState};

async fn wait_for_shutdown(shr_state: AppSharedState) {
    let log_ctx_p = shr_state.log_context().clone();
    if let Err(e) = tokio::signal::ctrl_c().await {
        app_log_event!(log_ctx_p, AppLogLevel::ERROR, "shutdown-signal-fail: {e}");
        return;
    }
    // reject new requests first, then let in-flight ones drain
    shr_state.shutdown().store(true, Ordering::Relaxed);
    let num_reqs = shr_state.num_requests();
    let mut patience = 50u8;
    while num_reqs.load(Ordering::Relaxed) > 0 && patience > 0 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        patience -= 1;
    }
    app_log_event!(log_ctx_p, AppLogLevel::INFO, "all in-flight requests drained");
} // end of fn wait_for_shutdown

async fn start_server(shr_state: AppSharedState) {
    let log_ctx_p = shr_state.log_context().clone();
    let cfg = shr_state.config().clone();
    let routes = route_table();
    let listener = &cfg.api_server.listen;
    let shutdown_layer = middleware::ShutdownDetectionLayer::new(
        shr_state.shutdown(),
        shr_state.num_requests(),
    );
    let (service, num_applied) = app_web_service(listener, routes, shr_state.clone());
    if num_applied == 0 {
        app_log_event!(
            log_ctx_p,
            AppLogLevel::ERROR,
            "no route created, web API server failed to start"
        );
        return;
    }
    let result = net_listener(listener.host.clone(), listener.port).await;
    match result {
        Ok(b) => {
            let connlm = middleware::conn_limit(listener.max_connections);
            let reqlm = middleware::req_body_limit(cfg.api_server.limit_req_body_in_bytes);
            let co = match middleware::cors(
                cfg.basepath.system.clone() + "/" + listener.cors.as_str(),
            ) {
                Ok(v) => v,
                Err(e) => {
                    app_log_event!(
                        log_ctx_p,
                        AppLogLevel::ERROR,
                        "cors layer init error, detail: {:?}",
                        e
                    );
                    CorsLayer::new()
                }
            };
            let service = service
                .layer(shutdown_layer)
                .layer(reqlm)
                .layer(co)
                .layer(connlm);
            let sr = axum::serve(b, service)
                .with_graceful_shutdown(wait_for_shutdown(shr_state));
            let _ = sr.await;
            app_log_event!(log_ctx_p, AppLogLevel::WARNING, "API server terminating");
        }
        Err(e) => {
            app_log_event!(log_ctx_p, AppLogLevel::ERROR, "API server failed to start, {} ", e);
        }
    }
} // end of fn start_server

fn start_async_runtime(cfg: AppConfig, confidential: Box<dyn AbstractConfidentiality>) {
    let log_ctx = AppLogContext::new(&cfg.basepath, &cfg.api_server.logging);
    let shr_state = match AppSharedState::new(cfg, log_ctx, confidential) {
        Ok(s) => s,
        Err(e) => {
            println!("app failed to init shared state, error: {} ", e);
            return;
        }
    };
    let cfg = shr_state.config();
    let log_ctx = shr_state.log_context().clone();
    let log_ctx2 = log_ctx.clone();
    let stack_nbytes: usize = (cfg.api_server.stack_sz_kb as usize) << 10;
    let result = RuntimeBuilder::new_multi_thread()
        .worker_threads(cfg.api_server.num_workers as usize)
        .on_thread_start(move || {
            // this `Fn()` closure will be invoked several times by new
            // threads, all variables moved in have to be clonable
            let log_cpy = log_ctx.clone();
            app_log_event!(log_cpy, AppLogLevel::INFO, "[API server] worker started");
        })
        .on_thread_stop(move || {
            let log_cpy = log_ctx2.clone();
            app_log_event!(log_cpy, AppLogLevel::INFO, "[API server] worker terminating");
        })
        .thread_stack_size(stack_nbytes)
        .thread_name("web-api-worker")
        // manage low-level I/O drivers used by network types
        .enable_io()
        .enable_time()
        .build();
    match result {
        Ok(rt) => {
            // new worker threads spawned
            rt.block_on(async move {
                start_server(shr_state).await;
            }); // runtime started
        }
        Err(e) => {
            let log_ctx_p = shr_state.log_context();
            app_log_event!(
                log_ctx_p,
                AppLogLevel::ERROR,
                "async runtime failed to build, {} ",
                e
            );
        }
    };
} // end of fn start_async_runtime

fn main() {
    let iter = env::vars().filter(|(k, _v)| EXPECTED_ENV_VAR_LABELS.contains(&k.as_str()));
    let arg_map: HashMap<String, String, RandomState> = HashMap::from_iter(iter);
    match AppConfig::new(arg_map) {
        Ok(cfg) => match confidentiality::build_context(&cfg) {
            Ok(confidential) => start_async_runtime(cfg, confidential),
            Err(e) => {
                println!("app failed to init confidentiality handler, error code: {} ", e);
            }
        },
        Err(e) => {
            println!("app failed to configure, error code: {} ", e);
        }
    };
} // end of main
