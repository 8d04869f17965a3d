//! 人类代理：从文本输入读取走法
//!
//! 输入 `moves` 列出所有合法走法；无法解析或不合法的走法会提示重新输入。

use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::str::FromStr;

use protocol::{Board, Color};
use tracing::debug;

use crate::agent::Agent;
use crate::error::{AgentError, Result};

const PROMPT: &str = "Enter your move: ";
const LIST_COMMAND: &str = "moves";

pub struct HumanAgent<R, W> {
    color: Color,
    input: R,
    output: W,
}

impl HumanAgent<StdinLock<'static>, Stdout> {
    /// 使用标准输入输出
    pub fn stdio(color: Color) -> Self {
        Self::new(color, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(color: Color, input: R, output: W) -> Self {
        Self {
            color,
            input,
            output,
        }
    }

    /// 取回输出端
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<B, R, W> Agent<B> for HumanAgent<R, W>
where
    B: Board,
    B::Move: FromStr + Display,
    <B::Move as FromStr>::Err: Display,
    R: BufRead,
    W: Write,
{
    fn color(&self) -> Color {
        self.color
    }

    fn name(&self) -> &str {
        "human"
    }

    fn select_move(&mut self, position: &B) -> Result<Option<B::Move>> {
        let moves = position.legal_moves();
        if moves.is_empty() {
            return Ok(None);
        }

        let mut line = String::new();
        loop {
            write!(self.output, "{PROMPT}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Err(AgentError::InputClosed);
            }

            if line.trim() == LIST_COMMAND {
                writeln!(self.output, "Possible moves:")?;
                for mv in &moves {
                    writeln!(self.output, "{mv}")?;
                }
                continue;
            }

            match position.parse_legal_move(&line) {
                Ok(mv) => return Ok(Some(mv)),
                Err(e) => {
                    debug!("拒绝输入的走法: {}", e);
                    writeln!(self.output, "Invalid move. Try again.")?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Nim;
    use std::io::Cursor;

    fn agent(input: &str) -> HumanAgent<Cursor<Vec<u8>>, Vec<u8>> {
        HumanAgent::new(Color::First, Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_reads_legal_move() -> anyhow::Result<()> {
        let mut human = agent("2\n");
        let mv = human.select_move(&Nim { pile: 5 })?;
        assert_eq!(mv, Some(2));
        assert_eq!(String::from_utf8(human.into_output())?, PROMPT);
        Ok(())
    }

    #[test]
    fn test_lists_moves() -> anyhow::Result<()> {
        let mut human = agent("moves\n3\n");
        let mv = human.select_move(&Nim { pile: 7 })?;
        assert_eq!(mv, Some(3));
        let output = String::from_utf8(human.into_output())?;
        assert_eq!(
            output,
            "Enter your move: Possible moves:\n1\n2\n3\nEnter your move: "
        );
        Ok(())
    }

    #[test]
    fn test_retries_invalid_input() -> anyhow::Result<()> {
        let mut human = agent("take two\n3\n1\n");
        let mv = human.select_move(&Nim { pile: 2 })?;
        assert_eq!(mv, Some(1));
        let output = String::from_utf8(human.into_output())?;
        assert_eq!(output.matches("Invalid move. Try again.").count(), 2);
        Ok(())
    }

    #[test]
    fn test_no_moves_skips_input() -> anyhow::Result<()> {
        let mut human = agent("");
        assert_eq!(human.select_move(&Nim { pile: 0 })?, None);
        assert!(human.into_output().is_empty());
        Ok(())
    }

    #[test]
    fn test_input_closed() {
        let mut human = agent("9\n");
        let err = human.select_move(&Nim { pile: 4 }).unwrap_err();
        assert!(matches!(err, AgentError::InputClosed));
    }
}
