//! List commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use cyclone_redis::Cyclone;

use crate::output;

#[derive(Args)]
pub struct ListArgs {
    /// Key holding the list
    pub key: String,

    #[command(subcommand)]
    pub command: ListCommands,
}

#[derive(Subcommand)]
pub enum ListCommands {
    /// Element at an index, negative counts from the tail (LINDEX)
    Index {
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Length of the list (LLEN)
    Len,

    /// Remove and print the head element (LPOP)
    Pop,

    /// Push elements at the head (LPUSH)
    Push {
        #[arg(required = true)]
        elems: Vec<String>,
    },

    /// Push at the head only if the list exists (LPUSHX)
    PushX {
        #[arg(required = true)]
        elems: Vec<String>,
    },

    /// Elements between two offsets, inclusive (LRANGE)
    Range {
        #[arg(allow_negative_numbers = true)]
        start: i64,
        #[arg(allow_negative_numbers = true)]
        stop: i64,
    },

    /// Remove occurrences of an element (LREM)
    Rem {
        /// >0 from head, <0 from tail, 0 all
        #[arg(allow_negative_numbers = true)]
        count: i64,
        elem: String,
    },

    /// Overwrite the element at an index (LSET)
    Set {
        #[arg(allow_negative_numbers = true)]
        index: i64,
        elem: String,
    },

    /// Keep only the given range (LTRIM)
    Trim {
        #[arg(allow_negative_numbers = true)]
        start: i64,
        #[arg(allow_negative_numbers = true)]
        stop: i64,
    },

    /// Remove and print the tail element (RPOP)
    Rpop,

    /// Push elements at the tail (RPUSH)
    Rpush {
        #[arg(required = true)]
        elems: Vec<String>,
    },

    /// Push at the tail only if the list exists (RPUSHX)
    RpushX {
        #[arg(required = true)]
        elems: Vec<String>,
    },
}

pub async fn execute(args: ListArgs, cyclone: &Cyclone) -> Result<()> {
    let list = cyclone.list(args.key.as_str());

    match args.command {
        ListCommands::Index { index } => output::print_value(list.index(index).await?.as_deref()),
        ListCommands::Len => output::print_count(list.len().await?),
        ListCommands::Pop => output::print_value(list.pop().await?.as_deref()),
        ListCommands::Push { elems } => output::print_count(list.push(elems.as_slice()).await?),
        ListCommands::PushX { elems } => output::print_count(list.push_x(elems.as_slice()).await?),
        ListCommands::Range { start, stop } => output::print_list(&list.range(start, stop).await?),
        ListCommands::Rem { count, elem } => output::print_count(list.rem(count, &elem).await?),
        ListCommands::Set { index, elem } => {
            list.set(index, &elem).await?;
            output::print_ok();
        }
        ListCommands::Trim { start, stop } => {
            list.trim(start, stop).await?;
            output::print_ok();
        }
        ListCommands::Rpop => output::print_value(list.rpop().await?.as_deref()),
        ListCommands::Rpush { elems } => output::print_count(list.rpush(elems.as_slice()).await?),
        ListCommands::RpushX { elems } => output::print_count(list.rpush_x(elems.as_slice()).await?),
    }

    Ok(())
}
