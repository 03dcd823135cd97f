/// quick start - create a contract and print its schedule
use installment_engine::{ContractLedger, ContractTerms, ContractView, Money, Periodicity};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = ContractLedger::default();

    // $1,000 over 3 monthly installments
    let terms = ContractTerms::builder()
        .principal(Money::from_major(1_000))
        .installments(3)
        .periodicity(Periodicity::monthly())
        .build()?;

    let contract = ledger.create_contract_now(terms)?;

    // print current state
    let view = ContractView::from_contract(&contract, ledger.config().status_locale);
    println!("{}", view.to_json_pretty()?);

    Ok(())
}
