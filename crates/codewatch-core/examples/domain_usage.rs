//! Walk-through of the codewatch domain model.
//!
//! ```sh
//! cargo run --example domain_usage -- [path/to/cosmos-sdk]
//! ```
//!
//! With a path argument, the demo also runs a toy keeper detector over every
//! `.go` file under it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use codewatch_core::models::*;
use codewatch_core::{
    CodewatchResult, Detector, Extractor, ExtractorConfig, InMemoryPatternRepository,
    PatternRepository, SourceTreeExtractor,
};
use serde_json::json;

/// Flags every `type ... Keeper struct` declaration.
struct NaiveKeeperDetector;

impl Detector for NaiveKeeperDetector {
    fn detect(&self, source_code: &str, file_path: &Path) -> CodewatchResult<Vec<Pattern>> {
        let package = source_code
            .lines()
            .find_map(|l| l.strip_prefix("package "))
            .unwrap_or("main")
            .trim()
            .to_string();

        let mut found = Vec::new();
        for (idx, line) in source_code.lines().enumerate() {
            let Some(rest) = line.trim().strip_prefix("type ") else {
                continue;
            };
            if !rest.ends_with("Keeper struct {") {
                continue;
            }
            let name = rest.split_whitespace().next().unwrap_or("Keeper");
            let keeper = KeeperPattern::new(
                PatternLocation::at_line(file_path, idx as i64 + 1)?,
                ConfidenceScore::LOW,
                PatternType::Keeper,
                Framework::CosmosSdk,
                QualifiedName::new(&package, name)?,
                vec![package.clone()],
                vec![],
            );
            if keeper.validate().is_ok() {
                found.push(keeper.into());
            }
        }
        sort_patterns(&mut found);
        Ok(found)
    }

    fn supported_pattern_type(&self) -> PatternType {
        PatternType::Keeper
    }
}

fn value_objects() -> CodewatchResult<()> {
    println!("== value objects");
    let whole_line = PatternLocation::at_line("cosmos/bank/keeper.go", 142)?;
    let point = PatternLocation::single_point("cosmos/bank/types.go", 25, 8)?;
    let range = PatternLocation::new("cosmos/bank/handler.go", 142, 158, 0, 4)?;
    println!("  {whole_line}\n  {point}\n  {range}");

    for score in [
        ConfidenceScore::high(),
        ConfidenceScore::medium(),
        ConfidenceScore::low(),
        ConfidenceScore::new(0.856)?,
        ConfidenceScore::new(1.00001)?,
    ] {
        println!("  confidence {score} ({})", score.value());
    }

    let name = QualifiedName::parse("github.com/cosmos/cosmos-sdk/x/bank/keeper.Keeper")?;
    println!("  package={} name={}", name.package(), name.name());

    for err in [
        PatternLocation::at_line("test.go", -1).err(),
        ConfidenceScore::new(1.5).err(),
        QualifiedName::new("", "Test").err(),
    ]
    .into_iter()
    .flatten()
    {
        println!("  rejected: {err}");
    }
    Ok(())
}

fn entities() -> CodewatchResult<Vec<Pattern>> {
    println!("== entities");
    let bank_keeper: Arc<Pattern> = Arc::new(
        KeeperPattern::new(
            PatternLocation::at_line("cosmos/bank/keeper.go", 142)?,
            ConfidenceScore::HIGH,
            PatternType::Keeper,
            Framework::CosmosSdk,
            QualifiedName::parse("cosmos.bank.keeper.Keeper")?,
            vec!["bank".to_string(), "supply".to_string()],
            vec![
                QualifiedName::parse("cosmos.auth.keeper.AccountKeeper")?,
                QualifiedName::parse("cosmos.params.keeper.Keeper")?,
            ],
        )
        .into(),
    );
    bank_keeper.validate()?;
    println!("  keeper {} at {}", bank_keeper.symbol(), bank_keeper.location());

    let send_handler: Arc<Pattern> = Arc::new(
        HandlerPattern::new(
            PatternLocation::at_line("cosmos/bank/handler.go", 25)?,
            ConfidenceScore::new(0.85)?,
            PatternType::MessageHandler,
            Framework::CosmosSdk,
            QualifiedName::parse("cosmos.bank.handler.SendHandler")?,
            HandlerType::Message,
            QualifiedName::parse("cosmos.bank.types.MsgSend")?,
            vec![QualifiedName::parse("cosmos.bank.keeper.Keeper")?],
        )
        .into(),
    );
    println!("  handler {} at {}", send_handler.symbol(), send_handler.location());

    let mut metadata = RelationMetadata::new();
    metadata.insert("reason".to_string(), json!("requires bank keeper"));
    let relation = PatternRelation::new(
        Arc::clone(&send_handler),
        Arc::clone(&bank_keeper),
        RelationType::DependsOn,
        metadata,
    )?;
    println!(
        "  {} -[{}]-> {}",
        relation.source().symbol(),
        relation.relation_type(),
        relation.target().symbol()
    );

    let self_loop = PatternRelation::new(
        Arc::clone(&bank_keeper),
        Arc::clone(&bank_keeper),
        RelationType::Calls,
        RelationMetadata::new(),
    );
    if let Err(err) = self_loop {
        println!("  rejected: {err}");
    }

    let empty_keeper = KeeperPattern::new(
        PatternLocation::at_line("keeper.go", 10)?,
        ConfidenceScore::HIGH,
        PatternType::Keeper,
        Framework::CosmosSdk,
        QualifiedName::parse("test.keeper.Keeper")?,
        vec![],
        vec![],
    );
    if let Err(err) = empty_keeper.validate() {
        println!("  rejected: {err}");
    }

    Ok(vec![(*bank_keeper).clone(), (*send_handler).clone()])
}

fn repository(patterns: &[Pattern]) -> CodewatchResult<()> {
    println!("== repository");
    let repo = InMemoryPatternRepository::new();
    repo.save_patterns(patterns)?;
    println!("  keepers: {}", repo.find_by_type(PatternType::Keeper)?.len());
    let bank_handlers = repo.execute_query("type:message_handler file:cosmos/bank")?;
    println!("  bank handlers: {}", bank_handlers.len());
    if let Err(err) = repo.execute_query("colour:blue") {
        println!("  rejected: {err}");
    }
    Ok(())
}

fn extraction(root: &Path) -> CodewatchResult<()> {
    println!("== extraction over {}", root.display());
    let extractor = SourceTreeExtractor::new(Framework::CosmosSdk, ExtractorConfig::from_env())?
        .with_detector(NaiveKeeperDetector);
    let report = extractor.extract_with_report(root)?;
    println!(
        "  {} pattern(s) in {} file(s), {} skipped",
        report.patterns.len(),
        report.files_scanned,
        report.skipped.len()
    );
    for pattern in report.patterns.iter().take(20) {
        println!("  - {} {}", pattern.symbol(), pattern.location());
    }
    println!("  framework: {}", extractor.supported_framework());
    Ok(())
}

fn main() -> CodewatchResult<()> {
    value_objects()?;
    let patterns = entities()?;
    repository(&patterns)?;
    if let Some(root) = std::env::args().nth(1).map(PathBuf::from) {
        extraction(&root)?;
    }
    Ok(())
}
