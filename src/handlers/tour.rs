//! Tour planning handler

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{debug, error};
use uuid::Uuid;

use crate::services::tour::TourPlanner;
use crate::types::{ErrorResponse, Request, SuccessResponse, TourError, TourRequest};

/// Handle showings.tour.plan requests
pub async fn handle_tour_plan(
    client: Client,
    mut subscriber: Subscriber,
    planner: Arc<TourPlanner>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                error!("Tour plan message without reply subject");
                continue;
            }
        };

        let request: Request<TourRequest> = match serde_json::from_slice(&msg.payload) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse tour plan request: {}", e);
                let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
                let _ = client
                    .publish(reply, serde_json::to_vec(&error)?.into())
                    .await;
                continue;
            }
        };

        debug!(
            "Planning tour for {} requested stops",
            request.payload.ids.len()
        );

        match planner.plan(&request.payload).await {
            Ok(response) => {
                let success = SuccessResponse::new(request.id, response);
                let _ = client
                    .publish(reply, serde_json::to_vec(&success)?.into())
                    .await;
            }
            Err(e) => {
                if let TourError::Internal(inner) = &e {
                    error!("Tour planning failed: {:#}", inner);
                }
                let error = ErrorResponse::new(request.id, e.code(), e.public_message());
                let _ = client
                    .publish(reply, serde_json::to_vec(&error)?.into())
                    .await;
            }
        }
    }

    Ok(())
}
