//! Phase loop background task

use anyhow::bail;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::state::{PomodoroTimer, Trigger};

/// Run `phases` consecutive pomodoro phases
///
/// Each phase advances the step counter, starts its countdown, and waits for
/// it to complete or be skipped. A reset from elsewhere ends the run early.
pub async fn run_phases(timer: PomodoroTimer, phases: u32) -> anyhow::Result<()> {
    info!("Starting pomodoro loop for {} phases", phases);

    let (trigger_tx, mut trigger_rx) = mpsc::unbounded_channel();
    let _subscription = timer.subscribe(move |event| {
        if let Some(trigger) = event.trigger() {
            // The receiver only goes away once the loop has returned.
            let _ = trigger_tx.send(trigger);
        }
    });

    for phase in 1..=phases {
        timer.next_pomodoro();
        timer.start_pomodoro()?;
        info!(
            "Phase {}/{}: {} for {}",
            phase,
            phases,
            timer.phase(),
            timer.display_string()
        );

        loop {
            match trigger_rx.recv().await {
                Some(Trigger::Completed) => {
                    info!("Phase {}/{} completed", phase, phases);
                    break;
                }
                Some(Trigger::Skipped) => {
                    info!("Phase {}/{} skipped", phase, phases);
                    break;
                }
                Some(Trigger::Reset) => {
                    info!("Pomodoro cycle reset, ending loop");
                    return Ok(());
                }
                Some(trigger) => debug!("Ignoring {:?} while waiting for phase end", trigger),
                None => bail!("timer event channel closed"),
            }
        }
    }

    info!("All {} phases finished", phases);
    Ok(())
}
