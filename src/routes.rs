use crate::{
    api::leave,
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/leaves")
                    .service(
                        web::resource("/createLeave").route(web::post().to(leave::create_leave)),
                    )
                    .service(
                        web::resource("/getAllLeaves").route(web::get().to(leave::all_leaves)),
                    )
                    .service(
                        web::resource("/updateStatus/{id}")
                            .route(web::put().to(leave::update_status)),
                    )
                    .service(
                        web::resource("/CancelLeaveById/{id}")
                            .route(web::put().to(leave::cancel_leave)),
                    )
                    .service(
                        web::resource("/addRemark/{id}").route(web::post().to(leave::add_remark)),
                    )
                    .service(
                        web::resource("/getRemark/{id}").route(web::get().to(leave::get_remarks)),
                    )
                    .service(
                        web::resource("/leaveBalance/{employee_id}")
                            .route(web::get().to(leave::leave_balance)),
                    )
                    .service(
                        web::resource("/latestActive/{employee_id}")
                            .route(web::get().to(leave::latest_active)),
                    )
                    .service(
                        web::resource("/DeleteLeaveById/{id}")
                            .route(web::delete().to(leave::delete_leave)),
                    )
                    .service(
                        web::resource("/applyingTo")
                            .route(web::get().to(leave::applying_to_list)),
                    )
                    .service(
                        web::resource("/ccToEmployees")
                            .route(web::get().to(leave::cc_employee_list)),
                    )
                    // literal segments above must win, so the catch-all id goes last
                    .service(web::resource("/{id}").route(web::get().to(leave::get_leave))),
            ),
    );
}
