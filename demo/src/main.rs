use announce::{Announcement, AnnouncementConfig, Catalog, Listener, catalog};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[catalog(prefix = "account.")]
pub struct AccountTopics {
    opened: String,
    deposited: i64,
    withdrawn: i64,
    closed: (),
}

#[derive(Debug, Default)]
struct Ledger {
    balance: i64,
    entries: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let bus = Announcement::with_config(AnnouncementConfig::builder().name("demo").build());
    let ledger = Rc::new(RefCell::new(Ledger::default()));
    info!(topics = ?AccountTopics::TOPICS, "catalog declared");

    // 记账：存款与取款
    let l = ledger.clone();
    let deposits = bus.on(&AccountTopics::DEPOSITED, move |amount| {
        let mut ledger = l.borrow_mut();
        ledger.balance += *amount;
        ledger.entries.push(format!("+{amount}"));
    });
    let l = ledger.clone();
    let withdrawals = bus.on(&AccountTopics::WITHDRAWN, move |amount| {
        let mut ledger = l.borrow_mut();
        ledger.balance -= *amount;
        ledger.entries.push(format!("-{amount}"));
    });

    // 开户时才挂上大额存款提醒，之后每笔大额存款都会触发；本次开户发布不会触发它
    let alerts: Rc<RefCell<Vec<Listener>>> = Rc::default();
    let (b, store) = (bus.clone(), alerts.clone());
    let _opened = bus.on(&AccountTopics::OPENED, move |owner| {
        info!(%owner, "account opened");
        let owner = owner.clone();
        let alert = b.on(&AccountTopics::DEPOSITED, move |amount| {
            if *amount >= 1_000 {
                info!(%owner, amount, "large deposit");
            }
        });
        store.borrow_mut().push(alert);
    });

    let closed = bus.once(&AccountTopics::CLOSED);

    bus.emit(&AccountTopics::OPENED, "alice".to_string());
    bus.emit(&AccountTopics::DEPOSITED, 1_500);
    bus.emit(&AccountTopics::WITHDRAWN, 200);
    bus.emit(&AccountTopics::DEPOSITED, 50);

    info!(
        deposits = bus.count(&AccountTopics::DEPOSITED),
        "subscribers before close"
    );
    bus.signal(&AccountTopics::CLOSED);
    closed.await?;

    deposits.dispose();
    withdrawals.dispose();
    bus.clear(&AccountTopics::DEPOSITED);

    let ledger = ledger.borrow();
    println!("balance: {}", ledger.balance);
    println!("entries: {:?}", ledger.entries);
    println!(
        "deposit subscribers after close: {}",
        bus.count(&AccountTopics::DEPOSITED)
    );
    Ok(())
}
