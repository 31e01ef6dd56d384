use std::io::Read;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;

use loopautoma_lib::config::{self, RecorderConfig};
use loopautoma_lib::geometry::{drag_to_rect, DragSelection, GestureSnapshot, LocalPoint, Point, SourceFrame, Viewport};
use loopautoma_lib::input::{FixedGeometry, RawInputEvent, ScriptedCapture};
use loopautoma_lib::keys;
use loopautoma_lib::{
    Action, LoopAutomaError, LoopAutomaResult, Recorder, RecorderBus, RecorderCommand, RecorderUpdate,
};

const USAGE: &str = "usage:
  loopautoma-recorder record [events.jsonl]
  loopautoma-recorder split <text>
  loopautoma-recorder region <x0> <y0> <x1> <y1> <vw> <vh> <fx> <fy> <fw> <fh>";

#[tokio::main]
async fn main() {
    loopautoma_lib::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args).await {
        tracing::error!(error = %e, "command failed");
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> LoopAutomaResult<()> {
    match args.first().map(String::as_str) {
        Some("record") => {
            let actions = record(args.get(1).map(String::as_str)).await?;
            println!("{}", serde_json::to_string_pretty(&actions)?);
        }
        Some("split") => {
            let text = args[1..].join(" ");
            println!("{}", serde_json::to_string_pretty(&keys::split(&text))?);
        }
        Some("region") => {
            let rect = region(&args[1..])?;
            println!("{}", serde_json::to_string_pretty(&rect)?);
        }
        _ => return Err(LoopAutomaError::Config(USAGE.to_string())),
    }
    Ok(())
}

/// Replay a JSON-lines event script through a recorder and return its actions.
/// Pointer coordinates are read as positions in the scaled screenshot preview.
async fn record(path: Option<&str>) -> LoopAutomaResult<Vec<Action>> {
    let cfg = match config::load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load config; using defaults");
            RecorderConfig::default()
        }
    };

    let script = read_script(path)?;
    tracing::info!(events = script.len(), "replaying input script");

    let snapshot = GestureSnapshot::for_scaled_preview(Point::new(0, 0), cfg.preview.screenshot_scale);
    let (capture, done) = ScriptedCapture::with_completion(script);
    let bus = RecorderBus::new(1024);
    let mut updates = bus.subscribe();
    let (mut recorder, handle) =
        Recorder::new(cfg.recording, Box::new(capture), Arc::new(FixedGeometry(snapshot)), bus);
    let task = tokio::spawn(async move { recorder.run_loop().await });

    handle.send(RecorderCommand::Start).await;
    let delivered = done
        .await
        .map_err(|_| LoopAutomaError::Recorder("input script was not delivered".into()))?;
    tracing::debug!(delivered, "input script delivered");
    handle.send(RecorderCommand::Stop).await;

    let result = loop {
        match updates.recv().await {
            Ok(RecorderUpdate::Completed(recording)) => break Ok(recording.actions),
            Ok(RecorderUpdate::Cancelled) => break Err(LoopAutomaError::Cancelled),
            Ok(RecorderUpdate::Error { message }) => break Err(LoopAutomaError::Recorder(message)),
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => tracing::debug!(skipped, "preview updates skipped"),
            Err(RecvError::Closed) => {
                break Err(LoopAutomaError::Recorder("recorder exited before completing".into()))
            }
        }
    };

    handle.send(RecorderCommand::Shutdown).await;
    if let Err(e) = task.await {
        tracing::warn!(error = %e, "recorder task did not exit cleanly");
    }
    result
}

fn read_script(path: Option<&str>) -> LoopAutomaResult<Vec<RawInputEvent>> {
    let content = match path {
        Some("-") | None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
        Some(path) => std::fs::read_to_string(path)?,
    };

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .map_err(|e| LoopAutomaError::Recorder(format!("line {}: {e}", n + 1)))
        })
        .collect()
}

fn region(args: &[String]) -> LoopAutomaResult<Option<loopautoma_lib::Rect>> {
    if args.len() != 10 {
        return Err(LoopAutomaError::Config(USAGE.to_string()));
    }

    let selection = DragSelection {
        start: LocalPoint::new(parse_arg(args, 0)?, parse_arg(args, 1)?),
        current: LocalPoint::new(parse_arg(args, 2)?, parse_arg(args, 3)?),
    };
    let viewport = Viewport::new(parse_arg(args, 4)?, parse_arg(args, 5)?);
    let frame = SourceFrame {
        origin_x: parse_arg(args, 6)?,
        origin_y: parse_arg(args, 7)?,
        pixel_width: parse_arg(args, 8)?,
        pixel_height: parse_arg(args, 9)?,
    };
    Ok(drag_to_rect(&selection, &frame, viewport))
}

fn parse_arg<T>(args: &[String], index: usize) -> LoopAutomaResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    args[index].parse::<T>().map_err(|e| {
        LoopAutomaError::Config(format!("argument {} ({:?}): {e}", index + 1, args[index]))
    })
}
