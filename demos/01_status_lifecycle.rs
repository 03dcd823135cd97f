/// status lifecycle - watch an installment go from open to overdue to settled
use installment_engine::{
    ContractLedger, ContractTerms, EngineConfig, InstallmentUpdate, Money, Periodicity,
    SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== installment status lifecycle ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let ledger = ContractLedger::new(EngineConfig::portuguese())?;
    let contract = ledger.create_contract(
        ContractTerms::new(Money::from_major(1_000), 3, Periodicity::monthly()),
        &time,
    )?;
    let locale = ledger.config().status_locale;
    let first = contract.installments[0].clone();

    println!("contracted at: {}", contract.contracted_at.format("%Y-%m-%d"));
    for installment in &contract.installments {
        println!(
            "   #{} due {} amount {} -> {}",
            installment.sequence,
            installment.due_date,
            installment.amount,
            installment.status.label(locale)
        );
    }

    // on the due date the installment is still open
    controller.advance(Duration::days(31));
    let current = ledger.installment(first.id, &time)?;
    println!("\n{}: {}", time.now().format("%Y-%m-%d"), current.status.label(locale));

    // one day later it is overdue
    controller.advance(Duration::days(1));
    let current = ledger.installment(first.id, &time)?;
    println!("{}: {}", time.now().format("%Y-%m-%d"), current.status.label(locale));

    // record a late payment
    controller.advance(Duration::days(10));
    let paid = ledger.update_installment(
        first.id,
        InstallmentUpdate::new(first.due_date, Some(time.now().date_naive())),
        &time,
    )?;
    println!(
        "{}: {} (paid late: {})",
        time.now().format("%Y-%m-%d"),
        paid.status.label(locale),
        paid.paid_late()
    );

    println!("\nevents:");
    for event in ledger.take_events() {
        println!("   {:?}", event);
    }

    Ok(())
}
