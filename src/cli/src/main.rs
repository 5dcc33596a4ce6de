use std::{fs, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use channel::{query_data, DataQuery, ResolvedSettings};
use common::config::Config;
use tracing::{debug, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use types::{DatasourceSettings, SubscriptionQuery};

fn parse_level(name: &str) -> Option<Level> {
    Level::from_str(name.trim()).ok()
}

fn main() -> Result<()> {
    let config = Config::load().context("load config")?;

    let parsed = parse_level(&config.log_level);
    let level = parsed.unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).context("set default subscriber")?;
    if parsed.is_none() {
        warn!("unknown log level {:?}, using {}", config.log_level, level);
    }
    debug!("{:?}", config);

    let txt = fs::read_to_string(&config.settings_path)
        .with_context(|| format!("read {}", config.settings_path))?;
    let settings: DatasourceSettings =
        serde_json::from_str(&txt).with_context(|| format!("parse {}", config.settings_path))?;

    let resolved = ResolvedSettings::from_settings(&settings);
    info!("{:?}", resolved);
    println!("broker url:  {}", resolved.broker_url);
    println!("client id:   {}", resolved.client_id);
    println!("username:    {}", resolved.username);
    println!(
        "password:    {}",
        if settings.is_password_configured() || !resolved.password.is_empty() {
            "configured"
        } else {
            "not configured"
        }
    );
    println!("qos:         {}", resolved.qos);
    match resolved.broker() {
        Ok(broker) => println!("broker:      {}", broker),
        Err(e) => warn!("{}", e),
    }

    let Some(queries_path) = &config.queries_path else {
        return Ok(());
    };
    let txt = fs::read_to_string(queries_path).with_context(|| format!("read {}", queries_path))?;
    let queries: Vec<SubscriptionQuery> =
        serde_json::from_str(&txt).with_context(|| format!("parse {}", queries_path))?;

    let interval = Duration::from_millis(config.interval_ms);
    let data_queries = queries
        .iter()
        .enumerate()
        .map(|(i, q)| {
            Ok(DataQuery {
                ref_id: q.ref_id().map(str::to_owned).unwrap_or_else(|| i.to_string()),
                json: serde_json::to_vec(q)?,
                interval,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    for (ref_id, resp) in query_data(&config.datasource_uid, &data_queries) {
        match (resp.channel(), &resp.error) {
            (Some(channel), _) => println!("{}: {}", ref_id, channel),
            (None, Some(e)) => println!("{}: {} {}", ref_id, resp.status.code(), e),
            (None, None) => println!("{}: {}", ref_id, resp.status.code()),
        }
    }

    Ok(())
}
