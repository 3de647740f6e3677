//! # command-handlers
//!
//! Dispatches self-sent commands to their flows:
//!
//! | Command | Flow |
//! |---|---|
//! | `.ai <query>` | [`AiAnswerFlow`]: streamed answer |
//! | `.aigen <query>` | [`AiImageFlow`]: titled streamed answer, then an illustration |
//! | `.usdt <amount>` / `.ton <amount>` / `.sol [amount]` | [`CryptoFlow`]: price conversion |
//!
//! [`CommandRouter`] holds the `{prefix, parser, flow}` table and implements
//! [`ubot_core::Handler`], so it plugs into a `handler_chain::HandlerChain`.

pub mod conversion;
pub mod flows;
pub mod parse;
pub mod router;
pub mod symbols;

pub use conversion::{
    convert, format_conversion, format_error, Conversion, ConversionMode, STAR_USD_PRICE,
};
pub use flows::{AiAnswerFlow, AiImageFlow, CryptoFlow, Flow};
pub use parse::parse_amount;
pub use router::{Command, CommandRouter, Route};
