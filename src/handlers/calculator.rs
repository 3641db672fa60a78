//! Crafting-table calculator handlers

use crate::TasCraftServer;
use crate::calculator::evaluate;
use mcp_attr::Result as McpResult;

impl TasCraftServer {
    pub async fn handle_calculate(&self, expression: String) -> McpResult<String> {
        Ok(format!("{} = {}", expression.trim(), evaluate(&expression)))
    }

    /// Press a sequence of keys on the shared keypad and show its screen.
    pub async fn handle_calculator(&self, keys: String) -> McpResult<String> {
        let mut hud = self.hud.lock().await;
        hud.keypad.press_keys(&keys);
        Ok(format!(
            "Display: {}\nExpression: {}",
            hud.keypad.display(),
            hud.keypad.expression()
        ))
    }
}
