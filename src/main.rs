use clap::Parser;
use serde_json::{json, Value};
use sns_client::config::cli::{Cli, Command, InstructionCommand, RecordCommand};
use sns_client::core::derivation::{
    get_domain_key, get_domain_key_with_parent, get_domain_mint, get_reverse_key,
};
use sns_client::core::instruction::{burn_domain, register_favourite, transfer_name};
use sns_client::utils::error::ErrorSeverity;
use sns_client::utils::validation::{format_domain, Validate};
use sns_client::utils::logger;
use sns_client::{Resolver, Result, RpcClient, SnsConfig, SnsError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI arguments: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(exit_code(e.severity()));
        }
    };

    if let Err(e) = run(&cli, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        std::process::exit(exit_code(e.severity()));
    }
}

/// 根據錯誤嚴重程度決定退出碼
fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 4,      // 紀錄存在但未通過驗證
        ErrorSeverity::Medium => 2,   // 網路錯誤，可重試
        ErrorSeverity::High => 1,     // 輸入或資料錯誤
        ErrorSeverity::Critical => 3, // 設定錯誤
    }
}

fn load_config(cli: &Cli) -> Result<SnsConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path.display());
            SnsConfig::from_file(path)?
        }
        None => SnsConfig::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

async fn run(cli: &Cli, config: &SnsConfig) -> Result<()> {
    let cluster = config.cluster();
    let resolver =
        Resolver::new(config.build_client(), cluster).with_config(config.resolve_config()?);
    tracing::debug!(url = %config.rpc_url(), %cluster, "🔗 Using RPC endpoint");

    let output = match &cli.command {
        Command::Resolve { domains } => {
            let mut rows = Vec::with_capacity(domains.len());
            for domain in domains {
                let owner = resolver.resolve_owner(domain).await?;
                rows.push(json!({ "domain": format_domain(domain), "owner": owner }));
            }
            Value::Array(rows)
        }
        Command::Lookup { domains } => {
            let mut rows = Vec::with_capacity(domains.len());
            for domain in domains {
                rows.push(lookup(&resolver, domain).await?);
            }
            Value::Array(rows)
        }
        Command::ReverseLookup { key } => {
            let name = resolver
                .reverse_lookup(key)
                .await?
                .ok_or_else(|| SnsError::DomainDoesNotExist(key.to_string()))?;
            json!({ "key": key, "domain": format_domain(&name) })
        }
        Command::Domains { owners } => {
            let mut rows = Vec::with_capacity(owners.len());
            for owner in owners {
                let domains = resolver.get_domain_keys_with_reverses(owner).await?;
                let tokenized = resolver.get_tokenized_domains(owner).await?;
                let mut names: Vec<Value> = domains
                    .into_iter()
                    .map(|(key, name)| {
                        json!({
                            "key": key,
                            "domain": name.map(|n| format_domain(&n)),
                            "tokenized": false,
                        })
                    })
                    .collect();
                names.extend(tokenized.into_iter().map(|t| {
                    json!({
                        "key": t.key,
                        "domain": format_domain(&t.reverse),
                        "tokenized": true,
                        "mint": t.mint,
                    })
                }));
                rows.push(json!({ "owner": owner, "domains": names }));
            }
            Value::Array(rows)
        }
        Command::Subdomains { domain } => {
            let key = get_domain_key(cluster, domain)?;
            let subs = resolver.get_subdomains(&key).await?;
            let parent = format_domain(domain);
            json!({
                "domain": parent,
                "subdomains": subs
                    .iter()
                    .map(|sub| format!("{}.{}", sub, parent))
                    .collect::<Vec<_>>(),
            })
        }
        Command::Favourite { owners } => {
            let mut rows = Vec::with_capacity(owners.len());
            for owner in owners {
                let primary = resolver.get_primary_domain(owner).await?;
                rows.push(json!({
                    "owner": owner,
                    "domain": primary.as_ref().map(|p| format_domain(&p.reverse)),
                    "key": primary.as_ref().map(|p| p.domain),
                    "stale": primary.map(|p| p.stale),
                }));
            }
            Value::Array(rows)
        }
        Command::Key { domains } => Value::Array(
            domains
                .iter()
                .map(|domain| {
                    let derived = get_domain_key_with_parent(cluster, domain)?;
                    Ok(json!({
                        "domain": format_domain(domain),
                        "key": derived.key,
                        "parent": derived.parent,
                        "reverse": get_reverse_key(cluster, domain)?,
                        "mint": get_domain_mint(cluster, &derived.key)?,
                        "is_sub": derived.is_sub,
                    }))
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        Command::Record(RecordCommand::Get { domain, record, v2 }) => {
            if *v2 {
                let records = resolver.get_domain_records_v2(domain, record).await?;
                json!({ "domain": format_domain(domain), "records": records })
            } else {
                let mut rows = Vec::with_capacity(record.len());
                for kind in record {
                    let content = match resolver.get_record_v1(domain, *kind).await {
                        Ok(content) => content,
                        Err(e @ SnsError::UnverifiedRecord) => {
                            tracing::warn!("⚠️ {} record of {} skipped: {}", kind, domain, e);
                            None
                        }
                        Err(e) => return Err(e),
                    };
                    rows.push(json!({ "record": kind, "content": content }));
                }
                json!({ "domain": format_domain(domain), "records": rows })
            }
        }
        Command::Instruction(command) => build_instruction(&resolver, command).await?,
    };

    print_output(cli.json, &output)
}

async fn lookup(resolver: &Resolver<RpcClient>, domain: &str) -> Result<Value> {
    let key = get_domain_key(resolver.cluster(), domain)?;
    let (header, data) = resolver
        .resolve_name_registry(&key)
        .await?
        .ok_or_else(|| SnsError::DomainDoesNotExist(format_domain(domain)))?;
    let nft_owner = resolver.resolve_nft_owner(&key).await?;
    Ok(json!({
        "domain": format_domain(domain),
        "key": key,
        "parent": header.parent_name,
        "owner": header.owner,
        "class": header.class,
        "nft_owner": nft_owner,
        "data_len": data.len(),
    }))
}

async fn build_instruction(
    resolver: &Resolver<RpcClient>,
    command: &InstructionCommand,
) -> Result<Value> {
    let cluster = resolver.cluster();
    let instruction = match command {
        InstructionCommand::Transfer {
            domain,
            new_owner,
            owner,
        } => {
            let key = get_domain_key(cluster, domain)?;
            let current_owner = match owner {
                Some(owner) => *owner,
                None => {
                    resolver
                        .resolve_name_registry(&key)
                        .await?
                        .ok_or_else(|| SnsError::DomainDoesNotExist(format_domain(domain)))?
                        .0
                        .owner
                }
            };
            transfer_name(key, *new_owner, current_owner, None, None)?
        }
        InstructionCommand::Burn {
            domain,
            owner,
            refund,
        } => burn_domain(cluster, domain, *owner, refund.unwrap_or(*owner))?,
        InstructionCommand::Favourite { domain, owner } => {
            let derived = get_domain_key_with_parent(cluster, domain)?;
            let parent = derived.is_sub.then_some(derived.parent);
            register_favourite(cluster, derived.key, *owner, parent)?
        }
    };
    tracing::info!("🛠️ Built instruction for program {}", instruction.program_id);
    Ok(instruction.to_json())
}

fn print_output(as_json: bool, output: &Value) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }
    match output {
        Value::Array(rows) => rows.iter().for_each(print_row),
        other => print_row(other),
    }
    Ok(())
}

fn print_row(row: &Value) {
    match row {
        Value::Object(fields) => {
            let line = fields
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| match v {
                    Value::String(s) => format!("{}: {}", k, s),
                    other => format!("{}: {}", k, other),
                })
                .collect::<Vec<_>>()
                .join("  ");
            println!("{}", line);
        }
        other => println!("{}", other),
    }
}
