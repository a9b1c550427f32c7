use f1core::model::{Compound, Driver, Stint};
use f1core::prelude::{
    lookup_driver, FetchOutcome, RacingData, SessionKey, StintSource, TyreBoard, TyreChart,
};
use f1core::sessions::SEASON;
use f1core::upstream::{OpenF1Client, DEFAULT_BASE_URL};
use iced::{
    mouse,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Pixels, Point, Rectangle, Renderer, Size, Task, Theme,
};
use log::{error, info, warn};
use std::{sync::Arc, time::Duration};

const LABEL_WIDTH: f32 = 56.0;
const RIGHT_MARGIN: f32 = 24.0;
const TOP_MARGIN: f32 = 10.0;
const ROW_HEIGHT: f32 = 24.0;
const BAR_HEIGHT: f32 = 16.0;
const AXIS_HEIGHT: f32 = 26.0;
const LEGEND_HEIGHT: f32 = 28.0;

fn main() -> iced::Result {
    env_logger::init();
    iced::application(TyreViewer::boot, TyreViewer::update, TyreViewer::view)
        .title(application_title)
        .theme(application_theme)
        .run()
}

fn application_title(_: &TyreViewer) -> String {
    format!("F1 Tire Stints - {SEASON}")
}

fn application_theme(_: &TyreViewer) -> Theme {
    Theme::Dark
}

struct TyreViewer {
    source: Arc<dyn RacingData>,
    board: TyreBoard,
    driver_input: String,
    driver: Option<Driver>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    GrandPrixChanged(String),
    FetchStints,
    StintsFetched(SessionKey, Result<Vec<Stint>, String>),
    DriverInputChanged(String),
    LookupDriver,
    DriverFetched(Result<Option<Driver>, String>),
}

fn build_source() -> Arc<dyn RacingData> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|err| {
            warn!("falling back to default HTTP client: {err}");
            reqwest::Client::new()
        });
    Arc::new(OpenF1Client::with_client(http, DEFAULT_BASE_URL))
}

impl TyreViewer {
    fn with_source(source: Arc<dyn RacingData>) -> Self {
        TyreViewer {
            source,
            board: TyreBoard::new(),
            driver_input: String::new(),
            driver: None,
            status: "Enter a Grand Prix name and fetch its stints.".into(),
            history: Vec::new(),
        }
    }

    fn boot() -> (Self, Task<Message>) {
        (Self::with_source(build_source()), Task::none())
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::GrandPrixChanged(value) => {
                state.board.set_grand_prix(value);
                Task::none()
            }
            Message::FetchStints => match state.board.session_key() {
                Some(session) => {
                    state.status = format!("Fetching session {session}...");
                    Task::perform(fetch_stints(state.source.clone(), session), move |result| {
                        Message::StintsFetched(session, result)
                    })
                }
                None => Task::none(),
            },
            Message::StintsFetched(session, Ok(stints)) => {
                state.board.apply_stints(stints);
                state.status = format!(
                    "Session {session}: {} drivers over {} laps",
                    state.board.drivers().len(),
                    state.board.total_laps()
                );
                let entry = format!("{} -> session {session}", state.board.grand_prix().trim());
                state.push_history(entry);
                Task::none()
            }
            Message::StintsFetched(session, Err(err)) => {
                error!("stints for session {session}: {err}");
                state.status = format!("Stint fetch failed: {err}");
                Task::none()
            }
            Message::DriverInputChanged(value) => {
                state.driver_input = value;
                Task::none()
            }
            Message::LookupDriver => Task::perform(
                fetch_driver(state.source.clone(), state.driver_input.clone()),
                Message::DriverFetched,
            ),
            Message::DriverFetched(Ok(Some(driver))) => {
                state.push_history(format!("Driver #{}", driver.driver_number));
                state.driver = Some(driver);
                Task::none()
            }
            Message::DriverFetched(Ok(None)) => {
                state.driver = None;
                state.status = format!("Driver {:?} not found", state.driver_input.trim());
                Task::none()
            }
            Message::DriverFetched(Err(err)) => {
                error!("driver lookup: {err}");
                state.driver = None;
                state.status = format!("Driver lookup failed: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let chart_view: Element<'_, Message> = match state.board.chart() {
            Some(chart) => {
                let height = TOP_MARGIN
                    + ROW_HEIGHT * chart.rows.len() as f32
                    + AXIS_HEIGHT
                    + LEGEND_HEIGHT;
                Canvas::new(StintChart { chart })
                    .width(Length::Fill)
                    .height(Length::Fixed(height))
                    .into()
            }
            None => text("Enter a valid Grand Prix name and click \"Fetch Data\" to see the chart.")
                .size(14)
                .into(),
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let stint_column = column![
            text(format!("F1 Tire Stint Visualization - {SEASON} Season")).size(26),
            row![
                text_input("Enter Grand Prix Name", state.board.grand_prix())
                    .on_input(Message::GrandPrixChanged)
                    .on_submit(Message::FetchStints)
                    .padding(6),
                button("Fetch Data").on_press(Message::FetchStints).padding(10),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
            text(&state.status).size(14),
            scrollable(chart_view).height(Length::Fill),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let driver_column = column![
            text("Driver").size(26),
            text_input("Driver number", &state.driver_input)
                .on_input(Message::DriverInputChanged)
                .on_submit(Message::LookupDriver)
                .padding(6),
            button("Show driver").on_press(Message::LookupDriver).padding(10),
            driver_card(state.driver.as_ref()),
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(120.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(320.0));

        let layout = row![stint_column, driver_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

fn driver_card(driver: Option<&Driver>) -> Column<'_, Message> {
    let Some(driver) = driver else {
        return Column::new().push(text("No driver selected").size(12));
    };
    let team_colour = parse_css_color(&driver.team_colour_css()).unwrap_or(Color::WHITE);
    column![
        text(&driver.full_name).size(22).color(team_colour),
        text(format!("Number: {}", driver.driver_number)).size(14),
        text(format!("Team: {}", driver.team_name)).size(14),
        text(format!("Broadcast Name: {}", driver.broadcast_name)).size(14),
        text(format!("Country: {}", driver.country_code)).size(14),
    ]
    .spacing(4)
}

async fn fetch_stints(
    source: Arc<dyn RacingData>,
    session: SessionKey,
) -> Result<Vec<Stint>, String> {
    match source.stints_for_session(session).await {
        FetchOutcome::Found(stints) => {
            info!("session {session}: {} stints", stints.len());
            Ok(stints)
        }
        FetchOutcome::NotFound => Ok(Vec::new()),
        FetchOutcome::TransportError(err) => Err(err.to_string()),
    }
}

async fn fetch_driver(source: Arc<dyn RacingData>, raw: String) -> Result<Option<Driver>, String> {
    match lookup_driver(source.as_ref(), &raw).await {
        FetchOutcome::Found(driver) => Ok(Some(driver)),
        FetchOutcome::NotFound => Ok(None),
        FetchOutcome::TransportError(err) => Err(err.to_string()),
    }
}

/// Parses `#rgb` / `#rrggbb`; anything else (such as `transparent`) is `None`.
fn parse_css_color(css: &str) -> Option<Color> {
    let hex = css.strip_prefix('#')?;
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    let channel = |index: usize| u8::from_str_radix(expanded.get(index..index + 2)?, 16).ok();
    Some(Color::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
}

fn label(content: String, position: Point) -> canvas::Text {
    canvas::Text {
        content,
        position,
        color: Color::from_rgb(0.85, 0.85, 0.88),
        size: Pixels(12.0),
        ..canvas::Text::default()
    }
}

#[derive(Clone)]
struct StintChart {
    chart: TyreChart,
}

impl canvas::Program<Message> for StintChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let total_laps = self.chart.total_laps.max(1);
        let plot_width = (bounds.width - LABEL_WIDTH - RIGHT_MARGIN).max(1.0);
        let scale = plot_width / total_laps as f32;
        let axis_y = TOP_MARGIN + ROW_HEIGHT * self.chart.rows.len() as f32;

        let step = if total_laps > 60 { 20 } else { 10 };
        let grid = Path::new(|builder| {
            let mut lap = 0;
            while lap <= total_laps {
                let x = LABEL_WIDTH + lap as f32 * scale;
                builder.move_to(Point::new(x, TOP_MARGIN));
                builder.line_to(Point::new(x, axis_y + 4.0));
                lap += step;
            }
        });
        frame.stroke(
            &grid,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgb(0.25, 0.25, 0.3)),
        );
        let mut lap = 0;
        while lap <= total_laps {
            let x = LABEL_WIDTH + lap as f32 * scale;
            frame.fill_text(label(lap.to_string(), Point::new(x - 6.0, axis_y + 8.0)));
            lap += step;
        }

        for (row_index, row) in self.chart.rows.iter().enumerate() {
            let y = TOP_MARGIN + row_index as f32 * ROW_HEIGHT + (ROW_HEIGHT - BAR_HEIGHT) / 2.0;
            frame.fill_text(label(row.label(), Point::new(6.0, y + 1.0)));

            let mut x = LABEL_WIDTH;
            for (segment_index, &laps) in row.segments.iter().enumerate() {
                let width = laps as f32 * scale;
                let color = self.chart.colors.color_at(segment_index, row_index);
                if let Some(fill) = parse_css_color(color.css()) {
                    if laps > 0 {
                        frame.fill_rectangle(Point::new(x, y), Size::new(width, BAR_HEIGHT), fill);
                    }
                }
                x += width;
            }
        }

        let legend_y = axis_y + AXIS_HEIGHT;
        let mut legend_x = LABEL_WIDTH;
        for compound in Compound::REGISTERED.iter() {
            if let Some(fill) = parse_css_color(compound.color()) {
                frame.fill_rectangle(Point::new(legend_x, legend_y), Size::new(12.0, 12.0), fill);
            }
            frame.fill_text(label(
                compound.label().to_string(),
                Point::new(legend_x + 18.0, legend_y - 1.0),
            ));
            legend_x += 110.0;
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use f1core::upstream::FixtureSource;

    fn fixture_viewer() -> TyreViewer {
        let fixture = FixtureSource::default().with_session(
            SessionKey(9558),
            vec![
                Stint::new(44, 1, 20, Compound::Medium),
                Stint::new(44, 20, 52, Compound::Intermediate),
                Stint::new(1, 1, 52, Compound::Hard),
            ],
        );
        TyreViewer::with_source(Arc::new(fixture))
    }

    #[test]
    fn css_colors_parse_short_and_long_forms() {
        assert_eq!(parse_css_color("#ffffff"), Some(Color::from_rgb8(255, 255, 255)));
        assert_eq!(parse_css_color("#888"), Some(Color::from_rgb8(0x88, 0x88, 0x88)));
        assert_eq!(parse_css_color("#ff2d55"), Some(Color::from_rgb8(0xff, 0x2d, 0x55)));
        assert_eq!(parse_css_color("transparent"), None);
        assert_eq!(parse_css_color("#zzzzzz"), None);
    }

    #[tokio::test]
    async fn fetched_stints_replace_the_board() {
        let mut viewer = fixture_viewer();
        let _ = TyreViewer::update(&mut viewer, Message::GrandPrixChanged("britain".into()));
        let session = viewer.board.session_key().unwrap();
        let result = fetch_stints(viewer.source.clone(), session).await;
        let _ = TyreViewer::update(&mut viewer, Message::StintsFetched(session, result));

        assert_eq!(viewer.board.total_laps(), 52);
        let chart = viewer.board.chart().unwrap();
        assert_eq!(chart.rows[0].driver_number, 1);
        assert_eq!(viewer.history.len(), 1);
    }

    #[test]
    fn failed_fetch_keeps_previous_chart() {
        let mut viewer = fixture_viewer();
        viewer
            .board
            .apply_stints(vec![Stint::new(16, 1, 30, Compound::Soft)]);
        let _ = TyreViewer::update(
            &mut viewer,
            Message::StintsFetched(SessionKey(9558), Err("timed out".into())),
        );
        assert_eq!(viewer.board.total_laps(), 30);
        assert!(viewer.status.contains("timed out"));
    }

    #[test]
    fn unknown_grand_prix_does_not_touch_state() {
        let mut viewer = fixture_viewer();
        let before = viewer.status.clone();
        let _ = TyreViewer::update(&mut viewer, Message::GrandPrixChanged("Atlantis".into()));
        let _ = TyreViewer::update(&mut viewer, Message::FetchStints);
        assert_eq!(viewer.status, before);
        assert!(viewer.board.stints().is_empty());
    }

    #[tokio::test]
    async fn driver_lookup_rejects_invalid_numbers() {
        let viewer = fixture_viewer();
        assert_eq!(fetch_driver(viewer.source.clone(), "0".into()).await, Ok(None));
        assert_eq!(fetch_driver(viewer.source.clone(), "44".into()).await, Ok(None));
    }
}
