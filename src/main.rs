use anyhow::{Context, Result};

mod config;
mod device;
mod motion;
mod poll;
mod shutdown;
mod touch;

use device::{touchpad::Touchpad, vmouse::VMouse};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    #[cfg(feature = "cli")]
    let cfg = config::ConfigPadMouse::from_cli()?;
    #[cfg(not(feature = "cli"))]
    let cfg = {
        let cfg = config::ConfigPadMouse::default();
        cfg.validate()?;
        cfg
    };
    log::debug!("{:?}", cfg);

    let touchpad = Touchpad::new(&cfg.touchpad)?;
    log::info!(
        "input device: {} ({})",
        touchpad.name(),
        touchpad.path().display()
    );

    let mut vmouse = VMouse::new(&cfg.device.name)?;
    for node in vmouse.dev_nodes()? {
        log::info!("vdev: {}", node.display());
    }

    let motion = motion::Motion::new(
        cfg.user.sensitivity(),
        cfg.user.deadzone,
        cfg.user.max_delta,
    );
    let shutdown = shutdown::Shutdown::install().context("failed to install signal handlers")?;
    poll::Poller::new(touchpad, vmouse, motion, cfg.user.poll_interval()).run(&shutdown);
    Ok(())
}
