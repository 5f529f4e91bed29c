quantity!(PencePerKilowattHour, "p/kWh");

impl PencePerKilowattHour {
    /// Total price of the specified amount of energy, in pounds.
    #[must_use]
    pub fn cost_of(self, kilowatt_hours: f64) -> crate::quantity::money::Pounds {
        crate::quantity::money::Pounds(self.0 * kilowatt_hours / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::PencePerKilowattHour as Rate;

    #[test]
    fn test_display() {
        assert_eq!(format!("{:.2}", Rate(15.4356)), "15.44 p/kWh");
    }

    #[test]
    fn test_ordering() {
        let mut rates = vec![Rate(3.0), Rate(-1.5), Rate(2.0)];
        rates.sort();
        assert_eq!(rates, [Rate(-1.5), Rate(2.0), Rate(3.0)]);
    }

    #[test]
    fn test_sum_and_divide() {
        let total: Rate = [Rate(10.0), Rate(5.0)].into_iter().sum();
        assert_abs_diff_eq!((total / 2.0).0, 7.5);
    }

    #[test]
    fn test_cost_of() {
        assert_abs_diff_eq!(Rate(15.44).cost_of(7.738).0, 1.194_747_2, epsilon = 1e-9);
    }
}
