use chrono::Local;
use nu_ansi_term::{Color, Style};
use std::fmt;
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::Context,
    prelude::*,
    registry::LookupSpan,
    Layer,
};

/// Width the `[context]` column is padded to, so messages line up.
const CONTEXT_WIDTH: usize = 20;

pub fn setup_logger() -> Option<WorkerGuard> {
    // Create logs directory
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::hourly("logs", "app");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // HTTP stack internals stay quiet unless something is wrong
    let file_filter = tracing_subscriber::filter::Targets::new()
        .with_target("hyper", Level::WARN)
        .with_target("hyper_util", Level::WARN)
        .with_target("reqwest", Level::WARN)
        .with_target("alloy_transport_http", Level::WARN)
        .with_default(Level::DEBUG);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .event_format(FileFormatter)
        .with_filter(file_filter);

    let console_filter = tracing_subscriber::filter::Targets::new()
        .with_target("hyper", Level::WARN)
        .with_target("hyper_util", Level::WARN)
        .with_target("reqwest", Level::WARN)
        .with_target("alloy_transport_http", Level::WARN)
        .with_default(Level::INFO);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .event_format(TerminalFormatter)
        .with_filter(console_filter);

    tracing_subscriber::registry()
        .with(ContextLayer)
        .with(file_layer)
        .with(console_layer)
        .init();

    // Return guard - MUST be kept alive by caller
    Some(guard)
}

/// Account label stored on a span by [`ContextLayer`].
#[derive(Debug, Clone)]
struct ContextLabel(String);

/// Copies the `context` field of every new span into its extensions so the
/// formatters can print it next to each event inside that span.
pub struct ContextLayer;

impl<S> Layer<S> for ContextLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        attrs.record(&mut visitor);
        if let (Some(label), Some(span)) = (visitor.context, ctx.span(id)) {
            span.extensions_mut().insert(ContextLabel(label));
        }
    }
}

// --- Formatters ---

#[derive(Default)]
struct FieldVisitor {
    message: String,
    context: Option<String>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{:?}", value),
            "context" => self.context = Some(format!("{:?}", value)),
            _ => {}
        }
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "context" => self.context = Some(value.to_string()),
            _ => {}
        }
    }
}

/// Event field wins, otherwise the innermost span carrying a label.
fn resolve<S, N>(ctx: &FmtContext<'_, S, N>, event: &Event<'_>) -> FieldVisitor
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let mut visitor = FieldVisitor::default();
    event.record(&mut visitor);

    if visitor.context.is_none() {
        if let Some(scope) = ctx.event_scope() {
            for span in scope {
                if let Some(label) = span.extensions().get::<ContextLabel>() {
                    visitor.context = Some(label.0.clone());
                    break;
                }
            }
        }
    }
    visitor
}

fn context_column(context: Option<&str>) -> String {
    let tag = context.map(|c| format!("[{}] ", c)).unwrap_or_default();
    format!("{:<width$}", tag, width = CONTEXT_WIDTH)
}

pub struct TerminalFormatter;

impl<S, N> FormatEvent<S, N> for TerminalFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let fields = resolve(ctx, event);
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");

        let level = match *event.metadata().level() {
            Level::ERROR => Style::new().fg(Color::LightRed).bold().paint("ERROR"),
            Level::WARN => Style::new().fg(Color::Yellow).bold().paint("WARN "),
            Level::INFO => Style::new().fg(Color::LightGreen).paint("INFO "),
            Level::DEBUG => Style::new().fg(Color::LightBlue).paint("DEBUG"),
            Level::TRACE => Style::new().fg(Color::DarkGray).paint("TRACE"),
        };

        write!(
            writer,
            "[ {} ] {} {}{}",
            Color::DarkGray.paint(timestamp.to_string()),
            level,
            context_column(fields.context.as_deref()),
            fields.message
        )?;
        writeln!(writer)
    }
}

pub struct FileFormatter;

impl<S, N> FormatEvent<S, N> for FileFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let fields = resolve(ctx, event);
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let level = event.metadata().level();

        write!(writer, "{} [{}] ", timestamp, level)?;
        writeln!(
            writer,
            "{}{}",
            context_column(fields.context.as_deref()),
            fields.message
        )
    }
}
