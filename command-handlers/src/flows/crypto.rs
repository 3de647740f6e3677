//! `.usdt`, `.ton`, `.sol`: live price conversion.

use super::Flow;
use crate::conversion::{convert, format_conversion, format_error, ConversionMode};
use crate::router::Command;
use crate::symbols::conversion_annotator;
use async_trait::async_trait;
use price_client::{PriceTicker, SOL_SYMBOL, TON_SYMBOL};
use std::sync::Arc;
use stream_render::{RenderedMessage, SafeEditSink, SymbolAnnotator};
use tracing::{info, warn};
use ubot_core::{HandlerError, MessageRef, Result, Transport};

pub struct CryptoFlow {
    transport: Arc<dyn Transport>,
    prices: Arc<dyn PriceTicker>,
    signature: String,
    annotator: SymbolAnnotator,
}

impl CryptoFlow {
    pub fn new(
        transport: Arc<dyn Transport>,
        prices: Arc<dyn PriceTicker>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            prices,
            signature: signature.into(),
            annotator: conversion_annotator(),
        }
    }

    /// Reply text for a conversion request.
    pub async fn quote(
        &self,
        mode: ConversionMode,
        amount: Option<f64>,
    ) -> std::result::Result<String, HandlerError> {
        let amount = amount.ok_or_else(|| {
            HandlerError::InvalidAmount("expected digits with up to two decimals".to_string())
        })?;

        let (ton, sol) = tokio::join!(
            self.prices.get_price(TON_SYMBOL),
            self.prices.get_price(SOL_SYMBOL)
        );
        let ton = ton.ok_or_else(|| HandlerError::PriceUnavailable(TON_SYMBOL.to_string()))?;
        let sol = sol.ok_or_else(|| HandlerError::PriceUnavailable(SOL_SYMBOL.to_string()))?;

        let conversion = convert(mode, amount, ton, sol);
        info!(?mode, amount, ton_price = ton, sol_price = sol, "step: converted");
        Ok(format_conversion(mode, amount, &conversion, &self.signature))
    }
}

#[async_trait]
impl Flow for CryptoFlow {
    async fn run(&self, target: &MessageRef, command: Command) -> Result<()> {
        let (mode, amount) = match command {
            Command::Convert { mode, amount } => (mode, amount),
            other => return Err(HandlerError::InvalidCommand(format!("{other:?}")).into()),
        };
        let text = self.quote(mode, amount).await.unwrap_or_else(|e| {
            warn!(error = %e, "Conversion failed");
            format_error(&self.signature)
        });
        let spans = self.annotator.annotate(&text);
        SafeEditSink::new(self.transport.clone(), target.clone())
            .apply(&RenderedMessage::new(text, spans))
            .await;
        Ok(())
    }
}
