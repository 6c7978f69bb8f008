use crate::domain::chips::Chips;
use crate::domain::player::{PlayerAtTable, PlayerStatus};
use crate::engine::actions::PlayerActionKind;
use crate::engine::betting::BettingState;
use crate::engine::errors::EngineError;

/// Проверка, может ли игрок выполнить это действие при текущем состоянии
/// ставок. Никаких мутаций: при ошибке состояние раздачи не меняется.
///
/// `min_bet` — минимальный размер первой ставки на улице (BB стола).
pub fn validate_action(
    player: &PlayerAtTable,
    action: &PlayerActionKind,
    betting: &BettingState,
    min_bet: Chips,
) -> Result<(), EngineError> {
    if matches!(
        player.status,
        PlayerStatus::Folded | PlayerStatus::Busted | PlayerStatus::SittingOut
    ) {
        return Err(EngineError::IllegalAction);
    }

    let stack = player.stack;
    let to_call = diff_to_call(player, betting);

    match action {
        PlayerActionKind::Fold => Ok(()),

        PlayerActionKind::Check => {
            if betting.current_bet.0 == player.current_bet.0 {
                Ok(())
            } else {
                Err(EngineError::CannotCheck)
            }
        }

        PlayerActionKind::Call => {
            if to_call.is_zero() {
                Err(EngineError::CannotCall)
            } else {
                // Колл короче текущей ставки — это неявный олл-ин,
                // обрабатывает engine; здесь он легален.
                Ok(())
            }
        }

        PlayerActionKind::Bet(amount) => {
            if betting.current_bet.0 > 0 {
                return Err(EngineError::IllegalAction); // bet только когда ставки ещё нет
            }
            if amount.is_zero() {
                return Err(EngineError::IllegalAction);
            }
            if stack.0 < amount.0 {
                return Err(EngineError::NotEnoughChips);
            }
            // Бет ниже минимума легален только как олл-ин на весь стек.
            if amount.0 < min_bet.0 && amount.0 < stack.0 {
                return Err(EngineError::BetTooSmall { min: min_bet.0 });
            }
            Ok(())
        }

        PlayerActionKind::Raise(total_bet) => {
            if betting.current_bet.0 == 0 {
                // Когда нет ставки — это bet, а не raise.
                return Err(EngineError::IllegalAction);
            }
            if total_bet.0 <= betting.current_bet.0 {
                return Err(EngineError::IllegalAction);
            }

            let diff = Chips(total_bet.0 - player.current_bet.0);
            if stack.0 < diff.0 {
                return Err(EngineError::NotEnoughChips);
            }

            // Рейз меньше минимального легален, только если он
            // ставит игрока в олл-ин.
            let is_all_in = diff.0 == stack.0;
            if !is_all_in {
                let raise_size = Chips(total_bet.0 - betting.current_bet.0);
                if raise_size.0 < betting.min_raise.0 {
                    return Err(EngineError::RaiseTooSmall);
                }
            }

            Ok(())
        }

        PlayerActionKind::AllIn => {
            if stack.is_zero() {
                return Err(EngineError::IllegalAction);
            }
            Ok(())
        }
    }
}

/// Сколько фишек нужно добавить игроку, чтобы уравнять текущую ставку.
pub fn diff_to_call(player: &PlayerAtTable, betting: &BettingState) -> Chips {
    if betting.current_bet.0 <= player.current_bet.0 {
        Chips::ZERO
    } else {
        Chips(betting.current_bet.0 - player.current_bet.0)
    }
}
