use super::eval::evaluate;

/// A key on the crafting-table keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Digit(char),
    Dot,
    /// One of `+ - * /`
    Operator(char),
    Equals,
    Clear,
    Backspace,
}

impl Key {
    /// Map a typed character to a key.
    ///
    /// `x` is the multiplication sign; `C` clears and `<` deletes one character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0'..='9' => Some(Key::Digit(c)),
            '.' => Some(Key::Dot),
            '+' | '-' | '*' | '/' => Some(Key::Operator(c)),
            'x' | 'X' => Some(Key::Operator('*')),
            '=' => Some(Key::Equals),
            'c' | 'C' => Some(Key::Clear),
            '<' => Some(Key::Backspace),
            _ => None,
        }
    }
}

/// Keypad state: what the screen shows, what will be evaluated, and whether
/// the screen currently holds a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keypad {
    display: String,
    expression: String,
    is_result: bool,
}

impl Default for Keypad {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            expression: String::new(),
            is_result: false,
        }
    }
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn is_result(&self) -> bool {
        self.is_result
    }

    pub fn press(&mut self, key: Key) {
        match key {
            Key::Digit(c) => self.enter(c, false),
            Key::Dot => self.enter('.', false),
            Key::Operator(c) => self.enter(c, true),
            Key::Equals => self.calculate(),
            Key::Clear => *self = Self::default(),
            Key::Backspace => self.backspace(),
        }
    }

    /// Press every recognised key in `keys`, skipping anything else.
    ///
    /// Returns the display after the last key.
    pub fn press_keys(&mut self, keys: &str) -> &str {
        for key in keys.chars().filter_map(Key::from_char) {
            self.press(key);
        }
        &self.display
    }

    fn enter(&mut self, c: char, is_operator: bool) {
        if self.is_result {
            self.is_result = false;
            if is_operator {
                // the screen keeps the result until the next key
                self.expression = format!("{}{}", self.display, c);
            } else {
                self.display = c.to_string();
                self.expression = c.to_string();
            }
            return;
        }

        if self.display == "0" && !is_operator {
            self.display = c.to_string();
            self.expression = c.to_string();
            return;
        }

        self.display.push(c);
        self.expression.push(c);
    }

    fn calculate(&mut self) {
        let result = evaluate(&self.expression);
        self.display = result.clone();
        self.expression = result;
        self.is_result = true;
    }

    fn backspace(&mut self) {
        self.expression.pop();
        self.display = if self.expression.is_empty() {
            "0".to_string()
        } else {
            self.expression.clone()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_keypad_shows_zero() {
        let keypad = Keypad::new();
        assert_eq!(keypad.display(), "0");
        assert_eq!(keypad.expression(), "");
        assert!(!keypad.is_result());
    }

    #[test]
    fn test_digit_replaces_leading_zero() {
        let mut keypad = Keypad::new();
        keypad.press(Key::Digit('7'));
        assert_eq!(keypad.display(), "7");
        assert_eq!(keypad.expression(), "7");
    }

    #[test]
    fn test_equals_shows_result() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.press_keys("2+3*4="), "14");
        assert_eq!(keypad.expression(), "14");
        assert!(keypad.is_result());
    }

    #[test]
    fn test_digit_after_result_starts_new_expression() {
        let mut keypad = Keypad::new();
        keypad.press_keys("2+2=");
        keypad.press(Key::Digit('9'));
        assert_eq!(keypad.display(), "9");
        assert_eq!(keypad.expression(), "9");
        assert!(!keypad.is_result());
    }

    #[test]
    fn test_operator_after_result_continues() {
        let mut keypad = Keypad::new();
        keypad.press_keys("2+3=");
        keypad.press(Key::Operator('*'));
        assert_eq!(keypad.display(), "5");
        assert_eq!(keypad.expression(), "5*");
        assert!(!keypad.is_result());

        keypad.press(Key::Digit('2'));
        assert_eq!(keypad.display(), "52");
        assert_eq!(keypad.expression(), "5*2");
        assert_eq!(keypad.press_keys("="), "10");
    }

    #[test]
    fn test_operator_on_zero_display() {
        let mut keypad = Keypad::new();
        keypad.press_keys("-3");
        assert_eq!(keypad.display(), "0-3");
        assert_eq!(keypad.expression(), "-3");
        assert_eq!(keypad.press_keys("="), "-3");
    }

    #[test]
    fn test_leading_plus_is_an_error() {
        let mut keypad = Keypad::new();
        keypad.press(Key::Operator('+'));
        assert_eq!(keypad.display(), "0+");
        assert_eq!(keypad.expression(), "+");
        assert_eq!(keypad.press_keys("5="), "Err");
    }

    #[test]
    fn test_x_is_multiplication() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.press_keys("6x7="), "42");
    }

    #[test]
    fn test_clear() {
        let mut keypad = Keypad::new();
        keypad.press_keys("12+3");
        keypad.press(Key::Clear);
        assert_eq!(keypad, Keypad::new());
    }

    #[test]
    fn test_backspace() {
        let mut keypad = Keypad::new();
        keypad.press_keys("12");
        keypad.press(Key::Backspace);
        assert_eq!(keypad.display(), "1");
        keypad.press(Key::Backspace);
        assert_eq!(keypad.display(), "0");
        assert_eq!(keypad.expression(), "");
    }

    #[test]
    fn test_error_result() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.press_keys("1/0="), "Err");
        // continuing from an error stays an error
        assert_eq!(keypad.press_keys("+1="), "Err");
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let mut keypad = Keypad::new();
        assert_eq!(keypad.press_keys(" 1 + 1 = "), "2");
    }
}
