use actix_web::web;

use crate::handlers::{
    health_handler, match_handler, message_handler, opinion_handler, player_handler,
    tournament_handler, vote_handler,
};

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/backend_health")
            .route(web::get().to(health_handler::backend_health))
    );

    cfg.service(
        web::resource("/tournaments")
            .route(web::get().to(tournament_handler::get_tournaments))
            .route(web::post().to(tournament_handler::create_tournament))
    );

    cfg.service(
        web::scope("/players")
            .service(
                web::resource("")
                    .route(web::get().to(player_handler::get_players))
                    .route(web::post().to(player_handler::create_player))
            )
            .service(
                web::resource("/top-scorers")
                    .route(web::get().to(player_handler::get_top_scorers))
            )
    );

    // Forum
    cfg.service(
        web::resource("/messages")
            .route(web::get().to(message_handler::get_messages))
            .route(web::post().to(message_handler::post_message))
    );

    // Matches; `/latest` must be registered before `/{match_number}`
    cfg.service(
        web::scope("/matches")
            .service(
                web::resource("")
                    .route(web::get().to(match_handler::list_matches))
                    .route(web::post().to(match_handler::create_match))
            )
            .service(
                web::resource("/latest")
                    .route(web::get().to(match_handler::latest_match))
            )
            .service(
                web::resource("/{match_number}")
                    .route(web::get().to(match_handler::get_match))
                    .route(web::put().to(match_handler::save_roster))
                    .route(web::delete().to(match_handler::delete_match))
            )
            .service(
                web::resource("/{match_number}/vote")
                    .route(web::get().to(vote_handler::get_my_vote))
                    .route(web::post().to(vote_handler::submit_vote))
            )
            .service(
                web::resource("/{match_number}/opinions")
                    .route(web::post().to(opinion_handler::create_opinion))
            )
    );
}
