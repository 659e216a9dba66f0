/// Running power-sum accumulator for one observable.
pub struct Statistics {
    pub count: usize,
    pub aggregate: f64,
    pub power: u32,
}

impl Statistics {
    pub fn new(power: u32) -> Self {
        Self {
            count: 0,
            aggregate: 0.0,
            power,
        }
    }

    pub fn update(&mut self, v: f64) {
        self.count += 1;
        self.aggregate += if self.power == 1 {
            v
        } else {
            v.powi(self.power as i32)
        };
    }

    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return self.aggregate;
        }
        self.aggregate / self.count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powers() {
        let mut s1 = Statistics::new(1);
        let mut s2 = Statistics::new(2);
        for v in [1.0, -2.0, 3.0] {
            s1.update(v);
            s2.update(v);
        }
        assert_eq!(s1.average(), 2.0 / 3.0);
        assert_eq!(s2.average(), 14.0 / 3.0);
    }

    #[test]
    fn test_empty_average_is_zero() {
        assert_eq!(Statistics::new(4).average(), 0.0);
    }
}
