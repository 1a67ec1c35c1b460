//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests:
//! ```nocompile
//!     fn my_handler() -> impl Responder {
//!         std::thread::sleep(Duration::from_secs(5)); // <-- Bad practice! Will cause the current worker thread to
//! hang!
//!     }
//! ```
//! For this reason, any long, non-cpu-bound operation (e.g. I/O, database operations, etc.) should be expressed as
//! futures or asynchronous functions. Async handlers get executed concurrently by worker threads and thus don’t block
//! execution:
//!
//! ```nocompile
//!     async fn my_handler() -> impl Responder {
//!         tokio::time::sleep(Duration::from_secs(5)).await; // <-- Ok. Worker thread will handle other requests here
//!     }
//! ```
use actix_web::{get, options, web, HttpResponse, Responder};
use log::*;
use order_intake_engine::{IntakeError, IntakeOrder, OrderIntakeApi, OrderIntakeDatabase};

use crate::{
    data_objects::{AutomationOrderPayload, EventReceived, OrderAccepted, VoiceAgentWebhook},
    errors::ServerError,
    intake_adapters::SourcePayload,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Pre-flight  ------------------------------------------------
/// Browsers send an `OPTIONS` request before cross-origin posts. The CORS headers are added to every response by the
/// server's default headers, so the body is empty.
#[options("/webhook/{source}")]
pub async fn preflight(path: web::Path<String>) -> impl Responder {
    trace!("💻️ Pre-flight request for webhook {}", path.into_inner());
    HttpResponse::Ok().finish()
}

//----------------------------------------------   Automation webhook  ----------------------------------------------
route!(automation_order => Post "/webhook/n8n" impl OrderIntakeDatabase);
/// Route handler for orders placed through the workflow-automation bot.
///
/// A successful order responds with `200` and the order number, id and total. Orders that fail validation, or that
/// contain items which could not be matched or priced, respond with `400`. Data store failures respond with `500`.
pub async fn automation_order<B: OrderIntakeDatabase>(
    body: web::Json<AutomationOrderPayload>,
    api: web::Data<OrderIntakeApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("🤖️ POST automation order");
    let order = IntakeOrder::from(SourcePayload::Automation(body.into_inner()));
    let accepted = submit_order(order, api.as_ref()).await?;
    Ok(HttpResponse::Ok().json(accepted))
}

//----------------------------------------------   Voice agent webhook  ----------------------------------------------
route!(voice_agent_webhook => Post "/webhook/vapi" impl OrderIntakeDatabase);
/// Route handler for the voice agent's call events.
///
/// The voice agent posts every call event to this endpoint, but only end-of-call reports carry an order. All other
/// events (and reports without any analysis data) are acknowledged with `{ "received": true }`.
pub async fn voice_agent_webhook<B: OrderIntakeDatabase>(
    body: web::Json<VoiceAgentWebhook>,
    api: web::Data<OrderIntakeApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let hook = body.into_inner();
    debug!("🎙️ POST voice agent event {:?}", hook.event_type());
    let Some(report) = hook.into_call_report() else {
        return Ok(HttpResponse::Ok().json(EventReceived::ack()));
    };
    let order = IntakeOrder::from(SourcePayload::VoiceAgent(report));
    let accepted = submit_order(order, api.as_ref()).await?;
    Ok(HttpResponse::Ok().json(accepted))
}

async fn submit_order<B: OrderIntakeDatabase>(
    order: IntakeOrder,
    api: &OrderIntakeApi<B>,
) -> Result<OrderAccepted, ServerError> {
    let source = order.source;
    let phone = order.phone.clone();
    api.process_order(order).await.map(OrderAccepted::from).map_err(|e| {
        match &e {
            IntakeError::Validation(v) => info!("💻️ Rejected {source} order from {phone}. {v}"),
            IntakeError::RejectedItems(items) => {
                warn!("💻️ Rejected {source} order from {phone}. Unusable items: {}", items.join("; "))
            },
            IntakeError::Persistence { stage, source: cause } => {
                error!("💻️ Could not save {source} order from {phone}. {stage}. {cause}")
            },
        }
        ServerError::from(e)
    })
}
