//! Currency conversion between USD, TON, SOL and Telegram Stars.

/// USD price of one Telegram Star.
pub const STAR_USD_PRICE: f64 = 0.015;

/// Currency the requested amount is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// `.usdt`: amount in USD.
    Usd,
    /// `.ton`: amount in TON.
    Ton,
    /// `.sol`: amount in SOL.
    Sol,
}

impl ConversionMode {
    /// Glyph naming the source currency in the reply header.
    pub fn symbol(self) -> &'static str {
        match self {
            ConversionMode::Usd => "💵",
            ConversionMode::Ton => "💎",
            ConversionMode::Sol => "🪙",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub usd: f64,
    pub ton: f64,
    pub sol: f64,
    pub stars: i64,
}

fn per_unit(value: f64, price: f64) -> f64 {
    if price > 0.0 {
        value / price
    } else {
        0.0
    }
}

/// Derive every amount from `amount` and the live USD prices.
///
/// A non-positive price yields 0 for that currency. Stars round half away from zero.
pub fn convert(mode: ConversionMode, amount: f64, ton_price: f64, sol_price: f64) -> Conversion {
    let (usd, ton, sol) = match mode {
        ConversionMode::Usd => (amount, per_unit(amount, ton_price), per_unit(amount, sol_price)),
        ConversionMode::Ton => {
            let usd = amount * ton_price;
            (usd, amount, per_unit(usd, sol_price))
        }
        ConversionMode::Sol => {
            let usd = amount * sol_price;
            (usd, per_unit(usd, ton_price), amount)
        }
    };
    Conversion {
        usd,
        ton,
        sol,
        stars: (usd / STAR_USD_PRICE).round() as i64,
    }
}

/// Reply text for a successful conversion.
pub fn format_conversion(
    mode: ConversionMode,
    amount: f64,
    conversion: &Conversion,
    signature: &str,
) -> String {
    let lines = match mode {
        ConversionMode::Usd => format!(
            " • 💎: {:.2}\n • 🪙: {:.2}\n • ⭐: {}\n",
            conversion.ton, conversion.sol, conversion.stars
        ),
        ConversionMode::Ton => format!(
            " • 💵: {:.2}\n • 🪙: {:.2}\n • ⭐: {}\n",
            conversion.usd, conversion.sol, conversion.stars
        ),
        ConversionMode::Sol => format!(
            " • 💵: {:.2}\n • 💎: {:.2}\n • ⭐: {}\n",
            conversion.usd, conversion.ton, conversion.stars
        ),
    };
    format!(
        "🧮 Конвертация  {amount:.2} {}:\n\n{lines}\n ✨ by @{signature}",
        mode.symbol()
    )
}

/// Reply text for an invalid amount or missing prices.
pub fn format_error(signature: &str) -> String {
    format!("✨ цена должна быть float или int\n\n ✨ by @{signature}")
}
