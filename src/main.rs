mod config;
mod form;
mod groq;
mod submission;
mod toast;
mod trip;

use iced::{
    widget::{button, column, container, pick_list, row, scrollable, slider, text, text_input},
    alignment, clipboard,
    event::{self, Event as IcedEvent},
    keyboard::{self, Key},
    time, window, Color, Element, Length, Subscription, Task, Theme,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::form::{Field, FieldStatus, FormState};
use crate::groq::{GenerationError, GroqClient};
use crate::submission::{ItineraryGenerator, SubmissionController, SubmissionState, ViewSignal};
use crate::toast::{Expiry, ToastId, ToastQueue};
use crate::trip::{TripRequest, TripType, MAX_DAYS, MIN_DAYS};

const ERROR_COLOR: Color = Color::from_rgb(0.93, 0.36, 0.36);
const COPY_TITLE: &str = "Itinerary copied!";
const COPY_DESCRIPTION: &str = "The itinerary was copied to the clipboard.";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() -> iced::Result {
    init_tracing();

    let config = config::Config::load();
    let window_settings = window::Settings {
        size: iced::Size::new(config.window.width as f32, config.window.height as f32),
        min_size: Some(iced::Size::new(
            config.window.min_width as f32,
            config.window.min_height as f32,
        )),
        position: window::Position::Centered,
        ..Default::default()
    };

    iced::application("Trip Planner", App::update, App::view)
        .theme(App::theme)
        .subscription(App::subscription)
        .window(window_settings)
        .run_with(move || App::new(config))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Form,
    Itinerary,
}

#[derive(Debug, Clone)]
enum Message {
    DestinationChanged(String),
    DaysChanged(u8),
    TripTypeSelected(TripType),
    InterestsChanged(String),
    BudgetChanged(String),
    Submit,
    Generated(TripRequest, Result<String, GenerationError>),
    SelectTab(Tab),
    CopyItinerary,
    Copied,
    ToastExpired(ToastId),
    Tick,
    Exit,
}

struct App {
    form: FormState,
    submission: SubmissionController,
    toasts: ToastQueue,
    toast_duration: Duration,
    tab: Tab,
    loading_frame: usize,
}

impl App {
    fn new(config: config::Config) -> (Self, Task<Message>) {
        let client = GroqClient::with_config(&config.api);
        tracing::info!(model = client.get_model(), "trip planner ready");

        let app = App::with_generator(Arc::new(client), config.toast.duration());
        (app, Task::none())
    }

    fn with_generator(generator: Arc<dyn ItineraryGenerator>, toast_duration: Duration) -> Self {
        App {
            form: FormState::new(),
            submission: SubmissionController::new(generator),
            toasts: ToastQueue::new(),
            toast_duration,
            tab: Tab::Form,
            loading_frame: 0,
        }
    }

    /// Validates the whole form and enters Loading. `None` when nothing was submitted.
    fn start_submission(&mut self) -> Option<TripRequest> {
        if self.submission.is_loading() || !self.form.is_submittable() {
            return None;
        }

        match self.form.to_request() {
            Ok(request) => {
                self.submission.begin(&request);
                Some(request)
            }
            Err(e) => {
                tracing::debug!("submit blocked: {e}");
                None
            }
        }
    }

    fn confirm_copy(&mut self) -> Expiry {
        self.toasts.enqueue(
            COPY_TITLE,
            Some(COPY_DESCRIPTION.to_string()),
            Some(self.toast_duration),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::DestinationChanged(value) => {
                self.form.set_field(Field::Destination, value);
                Task::none()
            }
            Message::DaysChanged(days) => {
                self.form.set_field(Field::Days, days);
                Task::none()
            }
            Message::TripTypeSelected(trip_type) => {
                self.form.set_field(Field::TripType, trip_type.as_str());
                Task::none()
            }
            Message::InterestsChanged(value) => {
                self.form.set_field(Field::Interests, value);
                Task::none()
            }
            Message::BudgetChanged(value) => {
                self.form.set_field(Field::Budget, value);
                Task::none()
            }
            Message::Submit => {
                let Some(request) = self.start_submission() else {
                    return Task::none();
                };
                let generator = self.submission.generator();

                Task::perform(
                    async move {
                        let outcome = generator.generate(&request).await;
                        (request, outcome)
                    },
                    |(request, outcome)| Message::Generated(request, outcome),
                )
            }
            Message::Generated(request, outcome) => {
                if self.submission.complete(request, outcome) == ViewSignal::ShowItinerary {
                    self.tab = Tab::Itinerary;
                }
                Task::none()
            }
            Message::SelectTab(tab) => {
                if tab == Tab::Form || self.submission.itinerary().is_some() {
                    self.tab = tab;
                }
                Task::none()
            }
            Message::CopyItinerary => match self.submission.itinerary() {
                Some((itinerary, _)) => {
                    clipboard::write::<Message>(itinerary.to_string()).chain(Task::done(Message::Copied))
                }
                None => Task::none(),
            },
            Message::Copied => {
                let expiry = self.confirm_copy();
                Task::perform(toast::expire_after(expiry), Message::ToastExpired)
            }
            Message::ToastExpired(id) => {
                self.toasts.expire(id);
                Task::none()
            }
            Message::Tick => {
                if self.submission.is_loading() {
                    self.loading_frame = (self.loading_frame + 1) % 10;
                }
                Task::none()
            }
            Message::Exit => iced::exit(),
        }
    }

    fn subscription(&self) -> Subscription<Message> {
        let timer = if self.submission.is_loading() {
            time::every(Duration::from_millis(80)).map(|_| Message::Tick)
        } else {
            Subscription::none()
        };

        let events = event::listen_with(|event, _status, _id| {
            if let IcedEvent::Keyboard(keyboard::Event::KeyPressed {
                key: Key::Named(keyboard::key::Named::Escape),
                ..
            }) = event
            {
                Some(Message::Exit)
            } else {
                None
            }
        });

        Subscription::batch([timer, events])
    }

    fn view(&self) -> Element<Message> {
        let has_itinerary = self.submission.itinerary().is_some();

        let tabs = row![
            button(text("Form"))
                .on_press(Message::SelectTab(Tab::Form))
                .width(Length::Fill),
            button(text("Itinerary"))
                .on_press_maybe(has_itinerary.then_some(Message::SelectTab(Tab::Itinerary)))
                .width(Length::Fill),
        ]
        .spacing(10);

        let body = match self.tab {
            Tab::Form => self.form_view(),
            Tab::Itinerary => self.itinerary_view(),
        };

        let mut content = column![
            text("Trip Planning Assistant").size(28),
            text("Fill in your trip details to generate a personalised itinerary.").size(15),
            tabs,
            scrollable(body).height(Length::Fill),
        ]
        .spacing(15)
        .padding(20);

        if !self.toasts.is_empty() {
            content = content.push(self.toast_view());
        }

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn form_view(&self) -> Element<Message> {
        let fields = self.form.fields();
        let loading = self.submission.is_loading();

        let destination = text_input("e.g. Paris, France", &fields.destination)
            .on_input(Message::DestinationChanged)
            .padding(10);
        let days = slider(MIN_DAYS..=MAX_DAYS, fields.days.get(), Message::DaysChanged);
        let trip_type = pick_list(
            TripType::ALL.to_vec(),
            fields.trip_type.parse::<TripType>().ok(),
            Message::TripTypeSelected,
        )
        .placeholder("Select the trip type");
        let interests = text_input("e.g. museums, beaches, hiking", &fields.interests)
            .on_input(Message::InterestsChanged)
            .padding(10);
        let budget = text_input("e.g. 1000", &fields.budget)
            .on_input(Message::BudgetChanged)
            .padding(10);

        let submit_label = if loading {
            let spinner = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
            format!("{} Generating itinerary...", spinner[self.loading_frame % spinner.len()])
        } else {
            "Generate Itinerary".to_string()
        };
        let can_submit = !loading && self.form.is_submittable();
        let submit = button(
            container(text(submit_label).size(18))
                .width(Length::Fill)
                .align_x(alignment::Horizontal::Center),
        )
        .on_press_maybe(can_submit.then_some(Message::Submit))
        .padding(12)
        .width(Length::Fill);

        let mut form = column![
            text("Destination").size(18),
            destination,
            self.field_error(Field::Destination),
            text(format!("Number of days ({})", fields.days)).size(18),
            days,
            text("Trip type").size(18),
            trip_type,
            text("Interests").size(18),
            interests,
            text("Total budget").size(18),
            budget,
            self.field_error(Field::Budget),
            submit,
        ]
        .spacing(8);

        if let Some(error) = self.submission.error() {
            form = form.push(
                container(text(error.to_string()).color(ERROR_COLOR))
                    .padding(12)
                    .width(Length::Fill),
            );
        }

        form.into()
    }

    fn field_error(&self, field: Field) -> Element<Message> {
        match self.form.status(field) {
            FieldStatus::Invalid(error) => text(error).size(14).color(ERROR_COLOR).into(),
            FieldStatus::Untouched | FieldStatus::Valid => column![].into(),
        }
    }

    fn itinerary_view(&self) -> Element<Message> {
        let SubmissionState::Succeeded { itinerary, request } = self.submission.state() else {
            return column![].into();
        };

        let trip_type = request.trip_type.map(TripType::label).unwrap_or("");
        let details = column![
            text("Trip details:").size(20),
            text(format!("• Destination: {}", request.destination)),
            text(format!("• Duration: {} days", request.days)),
            text(format!("• Trip type: {trip_type}")),
            text(format!("• Interests: {}", request.interests)),
            text(format!("• Budget: {} euros", request.budget)),
        ]
        .spacing(6);

        let header = row![
            text("Itinerary:").size(20).width(Length::Fill),
            button(text("[Copy]").size(14))
                .on_press(Message::CopyItinerary)
                .padding(8),
        ]
        .align_y(alignment::Vertical::Center);

        column![
            details,
            header,
            container(text(itinerary.clone()).size(16)).padding(15),
        ]
        .spacing(15)
        .into()
    }

    fn toast_view(&self) -> Element<Message> {
        let mut stack = column![].spacing(8);
        for toast in self.toasts.list() {
            let mut entry = column![text(toast.title.clone()).size(16)];
            if let Some(description) = &toast.description {
                entry = entry.push(text(description.clone()).size(13));
            }
            stack = stack.push(container(entry).padding(12));
        }

        container(stack)
            .width(Length::Fill)
            .align_x(alignment::Horizontal::Right)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::TokyoNight
    }
}
