//! Hash commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use cyclone_redis::Cyclone;
use futures::StreamExt;
use tracing::info;

use super::parse_pair;
use crate::output;

#[derive(Args)]
pub struct HashArgs {
    /// Key holding the hash
    pub key: String,

    #[command(subcommand)]
    pub command: HashCommands,
}

#[derive(Subcommand)]
pub enum HashCommands {
    /// Delete fields (HDEL)
    Del {
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Check whether a field exists (HEXISTS)
    Exists { field: String },

    /// Get a field's value (HGET)
    Get { field: String },

    /// Get all fields and values (HGETALL)
    GetAll {
        /// Print as a JSON object
        #[arg(long)]
        json: bool,
    },

    /// Increment an integer field (HINCRBY)
    Incr {
        field: String,
        #[arg(allow_negative_numbers = true)]
        by: i64,
    },

    /// Increment a float field (HINCRBYFLOAT)
    IncrFloat {
        field: String,
        #[arg(allow_negative_numbers = true)]
        by: f64,
    },

    /// List field names (HKEYS)
    Keys,

    /// Number of fields (HLEN)
    Len,

    /// Get several fields (HMGET)
    Mget {
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Set fields from field=value pairs (HSET)
    Set {
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },

    /// Set a field only if it does not exist (HSETNX)
    SetNx { field: String, value: String },

    /// Byte length of a field's value (HSTRLEN)
    StrLen { field: String },

    /// List values (HVALS)
    Vals,

    /// Iterate fields incrementally (HSCAN)
    Scan(ScanArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Glob pattern for field names
    #[arg(long = "match")]
    pub pattern: Option<String>,

    /// Page size hint (0 = server default)
    #[arg(long, default_value = "0")]
    pub count: usize,

    /// Items buffered between the scanner and the printer
    #[arg(long, default_value = "0")]
    pub buffer: usize,

    /// Emit field/value pairs instead of field names
    #[arg(long)]
    pub pairs: bool,

    /// With --pairs, print one JSON object per line
    #[arg(long, requires = "pairs")]
    pub json: bool,
}

pub async fn execute(args: HashArgs, cyclone: &Cyclone) -> Result<()> {
    let hash = cyclone.hash(args.key.as_str());

    match args.command {
        HashCommands::Del { fields } => {
            output::print_count(hash.del(fields.as_slice()).await?);
        }
        HashCommands::Exists { field } => {
            output::print_bool(hash.exists(&field).await?);
        }
        HashCommands::Get { field } => {
            output::print_value(hash.get(&field).await?.as_deref());
        }
        HashCommands::GetAll { json } => {
            let all = hash.get_all().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&all)?);
            } else {
                output::print_map(&all);
            }
        }
        HashCommands::Incr { field, by } => {
            println!("{}", hash.incr(&field, by).await?);
        }
        HashCommands::IncrFloat { field, by } => {
            println!("{}", hash.incr_float(&field, by).await?);
        }
        HashCommands::Keys => {
            output::print_list(&hash.keys().await?);
        }
        HashCommands::Len => {
            output::print_count(hash.len().await?);
        }
        HashCommands::Mget { fields } => {
            output::print_optional_list(&hash.mget(fields.as_slice()).await?);
        }
        HashCommands::Set { pairs } => {
            output::print_count(hash.set(pairs.as_slice()).await?);
        }
        HashCommands::SetNx { field, value } => {
            output::print_bool(hash.set_nx(&field, &value).await?);
        }
        HashCommands::StrLen { field } => {
            output::print_count(hash.str_len(&field).await?);
        }
        HashCommands::Vals => {
            output::print_list(&hash.vals().await?);
        }
        HashCommands::Scan(scan) => {
            let mut builder = hash.scan().count(scan.count);
            if let Some(pattern) = scan.pattern {
                builder = builder.pattern(pattern);
            }

            let mut items = 0usize;
            if scan.pairs {
                let mut stream = builder.fields(scan.buffer);
                while let Some(field) = stream.next().await {
                    let field = field?;
                    if scan.json {
                        println!("{}", serde_json::to_string(&field)?);
                    } else {
                        output::print_field(&field);
                    }
                    items += 1;
                }
            } else {
                let mut stream = builder.keys(scan.buffer);
                while let Some(elem) = stream.next().await {
                    println!("{}", elem?);
                    items += 1;
                }
            }
            info!(key = %args.key, items, "Scan complete");
        }
    }

    Ok(())
}
