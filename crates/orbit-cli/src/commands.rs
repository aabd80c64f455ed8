//! CLI command implementations.

use crate::AppContext;
use orbit_tx::Payment;
use orbit_types::constants::{EGLD_DECIMALS, EGLD_TICKER};
use orbit_types::{format_amount, parse_amount, parse_scanned_recipient, Address, MnemonicWords};
use orbit_wallet::host::scan_recipient;
use orbit_wallet::pin::MAX_PIN_LEN;
use orbit_wallet::{
    ClaimError, DashboardSnapshot, Host, ImpactStyle, NotificationKind, OnboardingStep, PinError,
    PinPad, PinSubmitError, Route, Session, Tab,
};
use std::io::{BufRead, Write};
use std::sync::Arc;
use zeroize::Zeroizing;

type Result = std::result::Result<(), Box<dyn std::error::Error>>;

// ─── Terminal host ──────────────────────────────────────────────────────────

/// Haptics are logged; the "scanner" reads a pasted payload from stdin.
struct TerminalHost;

impl Host for TerminalHost {
    fn impact(&self, style: ImpactStyle) {
        log::trace!("haptic impact {:?}", style);
    }

    fn notify(&self, kind: NotificationKind) {
        log::trace!("haptic notification {:?}", kind);
    }

    fn scan_qr(&self) -> Option<String> {
        let line = read_line("Paste scanned QR payload (empty to cancel): ").ok()?;
        if line.is_empty() {
            None
        } else {
            Some(line)
        }
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn read_line(prompt: &str) -> std::io::Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn open_session(ctx: &AppContext) -> std::result::Result<Session, Box<dyn std::error::Error>> {
    Ok(Session::open(ctx.config.clone(), &ctx.data_dir, &ctx.user_name)?)
}

/// Open a session and make sure onboarding has been completed.
fn open_onboarded(ctx: &AppContext) -> std::result::Result<Session, Box<dyn std::error::Error>> {
    let session = open_session(ctx)?;
    if session.navigate(Route::Home.path())? == Route::Intro {
        return Err("no wallet yet, run `onboard` first".into());
    }
    Ok(session)
}

/// Type the digits of `entered` into the pad. Input the pad would truncate
/// or ignore is rejected instead.
fn type_pin(pad: &mut PinPad, entered: &str) -> std::result::Result<(), String> {
    pad.clear();
    let len = entered.chars().count();
    if len > MAX_PIN_LEN {
        return Err(PinError::InvalidLength(len).to_string());
    }
    for c in entered.chars() {
        let digit = c.to_digit(10).ok_or("PIN must contain only digits")?;
        pad.press_digit(digit as u8);
    }
    Ok(())
}

/// Ask for the PIN until it unlocks `session`. Empty input cancels.
fn unlock_with_pin(
    session: &Session,
) -> std::result::Result<(MnemonicWords, Zeroizing<String>), Box<dyn std::error::Error>> {
    let mut pad = PinPad::new(Arc::new(TerminalHost));
    loop {
        let entered = Zeroizing::new(rpassword::prompt_password("PIN: ")?);
        if entered.is_empty() {
            return Err("cancelled".into());
        }
        if let Err(e) = type_pin(&mut pad, &entered) {
            eprintln!("{}", e);
            continue;
        }
        let unlocked = pad.submit_with(|pin| {
            let words = session.unlock(pin)?;
            Ok((words, Zeroizing::new(pin.to_string())))
        });
        match unlocked {
            Ok(unlocked) => return Ok(unlocked),
            Err(PinSubmitError::Pin(PinError::Retry)) => {
                eprintln!("Wrong PIN, try again (empty to cancel).")
            }
            Err(PinSubmitError::Pin(e)) => eprintln!("{}", e),
            Err(PinSubmitError::Wallet(e)) => return Err(e.into()),
        }
    }
}

/// Ask for a new PIN twice.
fn prompt_new_pin() -> std::result::Result<Zeroizing<String>, Box<dyn std::error::Error>> {
    let mut pad = PinPad::new(Arc::new(TerminalHost));
    loop {
        let entered = Zeroizing::new(rpassword::prompt_password("New PIN (4 or 6 digits): ")?);
        if let Err(e) = type_pin(&mut pad, &entered) {
            eprintln!("{}", e);
            continue;
        }
        let pin = match pad.submit() {
            Ok(pin) => pin,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };
        let confirm = Zeroizing::new(rpassword::prompt_password("Confirm PIN: ")?);
        if *confirm == *pin {
            return Ok(pin);
        }
        eprintln!("PINs do not match.");
        pad.clear();
    }
}

fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = ((percentage / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn print_snapshot(s: &DashboardSnapshot, ticker: &str) {
    println!("{}", s.greeting);
    println!();
    println!("  Next claim in: {}", s.countdown);
    println!("  {} {:5.1}%", progress_bar(s.percentage, 30), s.percentage);
    println!("  Tokens to claim: {} {}", s.reward, ticker);
    if s.claim_in_progress {
        println!("  Claim in progress...");
    } else if s.claimable {
        println!("  Ready to claim: run `claim`.");
    }
}

// ─── Commands ───────────────────────────────────────────────────────────────

pub async fn onboard(ctx: &AppContext, restore: bool) -> Result {
    let session = open_session(ctx)?;
    if session.has_visited()? {
        if let Some(address) = session.wallet_address()? {
            println!("Wallet already set up: {}", address);
            return Ok(());
        }
    }

    let mut flow = session.onboarding();
    println!("Welcome to Orbit.");
    println!("Mine {} every two hours and manage your MultiversX assets.", ctx.config.reward_ticker());
    flow.next()?;
    println!();
    println!("Your wallet lives on this device. Its recovery phrase is encrypted with your PIN.");
    read_line("Press Enter to continue...")?;
    flow.next()?;

    let words = if restore {
        let phrase = Zeroizing::new(rpassword::prompt_password("Recovery phrase: ")?);
        flow.restore(&phrase)?
    } else {
        flow.generate()?
    };
    println!();
    println!("Your recovery phrase:");
    for (i, word) in words.words().iter().enumerate() {
        print!("{:>2}. {:<12}", i + 1, word);
        if (i + 1) % 4 == 0 {
            println!();
        }
    }
    println!();

    if flow.next()? != OnboardingStep::Disclaimer {
        return Err("unexpected onboarding state".into());
    }
    println!("Write these words down and keep them offline. Anyone with them controls");
    println!("your funds, and they cannot be recovered if lost.");
    loop {
        let answer = read_line("Type \"I understand\" to continue: ")?;
        if answer.eq_ignore_ascii_case("i understand") {
            break;
        }
    }

    let pin = prompt_new_pin()?;
    println!("Encrypting recovery phrase...");
    let address = flow.acknowledge(&pin)?;
    session.window()?;
    println!("Wallet created.");
    println!("Address: {}", address);
    Ok(())
}

pub async fn dashboard(ctx: &AppContext) -> Result {
    let session = open_onboarded(ctx)?;
    let snapshot = session.snapshot()?;
    print_snapshot(&snapshot, ctx.config.reward_ticker());

    let report = session.balances().await?;
    println!();
    println!(
        "  {:<8} {}",
        EGLD_TICKER,
        format_amount(report.balances.egld, EGLD_DECIMALS)
    );
    println!(
        "  {:<8} {}",
        ctx.config.reward_ticker(),
        format_amount(report.balances.reward, ctx.config.reward_decimals)
    );
    if let Some(e) = report.warning {
        eprintln!("Warning: balances unavailable ({})", e);
    }
    Ok(())
}

pub async fn watch(ctx: &AppContext) -> Result {
    let session = open_onboarded(ctx)?;
    let mut rx = session.start_ticker()?;
    let ticker = ctx.config.reward_ticker();

    loop {
        {
            let s = rx.borrow_and_update();
            print!(
                "\r{}  {} {:5.1}%  {} {}{}   ",
                s.countdown,
                progress_bar(s.percentage, 20),
                s.percentage,
                s.reward,
                ticker,
                if s.claimable { "  (ready)" } else { "" }
            );
            std::io::stdout().flush()?;
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    println!();
    session.shutdown();
    Ok(())
}

pub async fn claim(ctx: &AppContext) -> Result {
    let session = open_onboarded(ctx)?;
    let host = TerminalHost;
    match session.claim().await {
        Ok(outcome) => {
            host.notify(NotificationKind::Success);
            println!(
                "Claimed {} {} (tx {})",
                outcome.amount,
                ctx.config.reward_ticker(),
                outcome.tx_hash
            );
            println!(
                "Next window ends in {}",
                orbit_wallet::Countdown::from_seconds(
                    (outcome.new_window.duration_ms() / 1000) as u64
                )
            );
            Ok(())
        }
        Err(ClaimError::ClaimNotReady { remaining_secs }) => {
            host.notify(NotificationKind::Warning);
            Err(format!(
                "not ready yet, {} remaining",
                orbit_wallet::Countdown::from_seconds(remaining_secs)
            )
            .into())
        }
        Err(e) => {
            host.notify(NotificationKind::Error);
            Err(e.into())
        }
    }
}

pub async fn reset(ctx: &AppContext) -> Result {
    let session = open_onboarded(ctx)?;
    let window = session.reset_window()?;
    println!(
        "Window restarted, next claim in {}",
        orbit_wallet::Countdown::from_seconds((window.duration_ms() / 1000) as u64)
    );
    Ok(())
}

pub async fn balance(ctx: &AppContext) -> Result {
    let session = open_onboarded(ctx)?;
    let report = session.balances().await?;
    if let Some(e) = &report.warning {
        eprintln!("Warning: could not reach the gateway ({}), showing zero", e);
    }
    println!(
        "{}: {}",
        EGLD_TICKER,
        format_amount(report.balances.egld, EGLD_DECIMALS)
    );
    println!(
        "{}: {}",
        ctx.config.reward_ticker(),
        format_amount(report.balances.reward, ctx.config.reward_decimals)
    );
    Ok(())
}

pub async fn send(
    ctx: &AppContext,
    to: Option<String>,
    scan: Option<String>,
    amount: Option<String>,
    token: Option<String>,
    decimals: Option<u32>,
) -> Result {
    let session = open_onboarded(ctx)?;

    let (receiver, scanned_amount) = match (to, scan) {
        (Some(to), _) => (Address::from_bech32(&to)?, None),
        (None, Some(payload)) => {
            let r = parse_scanned_recipient(&payload)?;
            (r.address, r.amount)
        }
        (None, None) => match scan_recipient(&TerminalHost)? {
            Some(r) => (r.address, r.amount),
            None => return Err("no recipient given".into()),
        },
    };
    let amount = amount
        .or(scanned_amount)
        .ok_or("no amount given (use --amount)")?;

    let (payment, label, decimals) = match token {
        Some(token) => {
            let decimals = decimals.unwrap_or(if token == ctx.config.reward_token {
                ctx.config.reward_decimals
            } else {
                EGLD_DECIMALS
            });
            let base = parse_amount(&amount, decimals)?;
            let label = token.clone();
            (Payment::Esdt { token, amount: base }, label, decimals)
        }
        None => (
            Payment::Egld(parse_amount(&amount, EGLD_DECIMALS)?),
            EGLD_TICKER.to_string(),
            EGLD_DECIMALS,
        ),
    };

    println!(
        "Sending {} {} to {}",
        format_amount(payment.amount(), decimals),
        label,
        receiver
    );
    let (words, _pin) = unlock_with_pin(&session)?;
    let hash = session.send(&words, &receiver, payment).await?;
    println!("Transaction submitted: {}", hash);
    Ok(())
}

pub async fn receive(ctx: &AppContext) -> Result {
    let session = open_onboarded(ctx)?;
    let address = session.wallet_address()?.ok_or("no wallet address stored")?;
    let bech32 = address.to_bech32();

    let code = qrcode::QrCode::new(bech32.as_bytes())?;
    let rendered = code
        .render::<qrcode::render::unicode::Dense1x2>()
        .dark_color(qrcode::render::unicode::Dense1x2::Light)
        .light_color(qrcode::render::unicode::Dense1x2::Dark)
        .build();
    println!("{}", rendered);
    println!("{}", bech32);
    log::debug!("network {}", ctx.config.network);
    Ok(())
}

pub async fn show_seed(ctx: &AppContext) -> Result {
    let session = open_onboarded(ctx)?;
    let (words, _pin) = unlock_with_pin(&session)?;
    println!("Recovery phrase (keep it secret):");
    for (i, word) in words.words().iter().enumerate() {
        println!("{:>2}. {}", i + 1, word);
    }
    Ok(())
}

pub async fn change_pin(ctx: &AppContext) -> Result {
    let session = open_onboarded(ctx)?;
    println!("Enter your current PIN.");
    let (_words, old_pin) = unlock_with_pin(&session)?;
    let new_pin = prompt_new_pin()?;
    session.vault().change_passphrase(&old_pin, &new_pin)?;
    println!("PIN changed.");
    Ok(())
}

pub async fn tx_status(ctx: &AppContext, hash: &str) -> Result {
    let session = open_session(ctx)?;
    let status = session.wallet().transaction_status(hash).await?;
    println!("{}: {}", hash, status);
    Ok(())
}

pub async fn placeholder_tab(ctx: &AppContext, tab: Tab) -> Result {
    let session = open_onboarded(ctx)?;
    let route = session.navigate(tab.route().path())?;
    println!("{} ({})", tab.label(), route);
    println!("Coming soon.");
    Ok(())
}
