use anyhow::Result;
use std::io::Write;
use std::thread;

use perftools_config::DemoConfig;
use perftools_timer::TimerContext;
use tracing::debug;

/// Sleep inside a timer scope and return the finished timer.
pub fn run_demo<W: Write>(config: &DemoConfig, sink: W) -> Result<TimerContext<W>> {
    config.validate()?;
    let pause = config.sleep_duration()?;

    let mut timer = TimerContext::from_config(&config.label, &config.timer).with_sink(sink);
    {
        let _scope = timer.enter()?;
        thread::sleep(pause);
    }

    debug!(label = timer.label(), elapsed = ?timer.elapsed(), "demo finished");
    Ok(timer)
}
