use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::groq::GenerationError;
use crate::trip::TripRequest;

pub const UNKNOWN_FAILURE: &str = "An unknown error occurred while generating the itinerary.";

pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String, GenerationError>> + Send + 'a>>;

/// Produces itinerary text for a trip. Called exactly once per submission.
pub trait ItineraryGenerator: Send + Sync {
    fn generate<'a>(&'a self, request: &'a TripRequest) -> GenerateFuture<'a>;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Failed {
        message: String,
    },
    Succeeded {
        itinerary: String,
        request: TripRequest,
    },
}

/// What the view should do once a submission settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSignal {
    ShowItinerary,
    StayOnForm,
}

pub fn failure_message(error: &GenerationError) -> String {
    let detail = error.to_string();
    if detail.trim().is_empty() {
        UNKNOWN_FAILURE.to_string()
    } else {
        format!("Failed to generate itinerary: {detail}")
    }
}

/// Owns the submission lifecycle: Idle -> Loading -> Succeeded | Failed.
///
/// Callers must not submit while `is_loading()`; the controller does not
/// reject a second call, it simply lets both run.
pub struct SubmissionController {
    state: SubmissionState,
    generator: Arc<dyn ItineraryGenerator>,
}

impl SubmissionController {
    pub fn new(generator: Arc<dyn ItineraryGenerator>) -> Self {
        SubmissionController {
            state: SubmissionState::Idle,
            generator,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SubmissionState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed { message } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn itinerary(&self) -> Option<(&str, &TripRequest)> {
        match &self.state {
            SubmissionState::Succeeded { itinerary, request } => Some((itinerary.as_str(), request)),
            _ => None,
        }
    }

    pub fn generator(&self) -> Arc<dyn ItineraryGenerator> {
        self.generator.clone()
    }

    /// Enters Loading, dropping any previous error or result.
    pub fn begin(&mut self, request: &TripRequest) {
        tracing::info!(destination = %request.destination, days = request.days.get(), "generating itinerary");
        self.state = SubmissionState::Loading;
    }

    pub fn complete(
        &mut self,
        request: TripRequest,
        outcome: Result<String, GenerationError>,
    ) -> ViewSignal {
        match outcome {
            Ok(itinerary) => {
                tracing::info!(chars = itinerary.len(), "itinerary generated");
                self.state = SubmissionState::Succeeded { itinerary, request };
                ViewSignal::ShowItinerary
            }
            Err(e) => {
                tracing::error!("itinerary generation failed: {e}");
                self.state = SubmissionState::Failed {
                    message: failure_message(&e),
                };
                ViewSignal::StayOnForm
            }
        }
    }

    /// Runs a whole submission: one generator call, no retry, no cancellation.
    /// The iced loop splits this into `begin` and `complete` around a `Task`.
    #[cfg(test)]
    pub async fn submit(&mut self, request: TripRequest) -> ViewSignal {
        self.begin(&request);
        let generator = self.generator.clone();
        let outcome = generator.generate(&request).await;
        self.complete(request, outcome)
    }
}
